//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── page ───────────────────────────────────────────────────
    pub fn viewport_style() -> Style {
        Style::default().bg(Color::Rgb(18, 18, 24)).fg(Color::Gray)
    }

    pub fn heading_style() -> Style {
        Style::default()
            .fg(Color::LightMagenta)
            .add_modifier(Modifier::BOLD)
    }

    pub fn landmark_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn anchor_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    // ── carousel ───────────────────────────────────────────────
    pub fn carousel_style() -> Style {
        Style::default().bg(Color::Rgb(40, 44, 60)).fg(Color::White)
    }

    pub fn carousel_border_style(pinned: bool) -> Style {
        if pinned {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        }
    }

    /// Fully darkened clip (late scale-down).
    pub fn silhouette_style() -> Style {
        Style::default().bg(Color::Black).fg(Color::Black)
    }

    pub fn caption_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dim_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn playing_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn info_bar_style() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}
