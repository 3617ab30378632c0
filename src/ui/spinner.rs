//! Playback indicator: a small spinner, the playhead and a sound glyph,
//! rendered in the top-right corner of the carousel box.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use super::theme::Theme;

/// Braille-dot spinner frames, advanced by the playhead.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Frames per second of playhead.
const SPIN_RATE: f64 = 10.0;

pub struct PlaybackIndicator {
    pub playing: bool,
    pub muted: bool,
    /// Playhead, seconds.
    pub position: f64,
    pub duration: f64,
}

impl PlaybackIndicator {
    pub fn label(&self) -> String {
        let icon = if self.playing {
            SPINNER_FRAMES[(self.position.max(0.0) * SPIN_RATE) as usize % SPINNER_FRAMES.len()]
        } else {
            "⏸"
        };
        let sound = if self.muted { "🔇" } else { "♪" };
        format!(
            " {icon} {} / {} {sound} ",
            clock(self.position),
            clock(self.duration)
        )
    }
}

/// `m:ss`.
fn clock(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

impl Widget for PlaybackIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = if self.playing {
            Theme::playing_style()
        } else {
            Theme::dim_style()
        };
        let line = Line::from(Span::styled(self.label(), style));
        let label_width = line.width() as u16;
        if area.width < label_width + 2 || area.height == 0 {
            return;
        }

        // Top-right, inside the border.
        let x = area.x + area.width.saturating_sub(label_width + 1);
        buf.set_line(x, area.y, &line, label_width);
    }
}
