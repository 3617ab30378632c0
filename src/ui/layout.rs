//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout: simulated browser pane, a frame info line and a
/// bottom status bar.
pub struct AppLayout {
    pub view_area: Rect,
    pub info_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // browser pane (takes all remaining space)
                Constraint::Length(1), // frame info
                Constraint::Length(1), // status / key hints
            ])
            .split(area);

        Self {
            view_area: chunks[0],
            info_area: chunks[1],
            status_area: chunks[2],
        }
    }
}
