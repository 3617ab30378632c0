//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into cells on
//! the terminal.  It never drives playback.

pub mod carousel;
pub mod layout;
pub mod smooth_scroll;
pub mod spinner;
pub mod status;
pub mod theme;
