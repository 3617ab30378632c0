//! Input handling: maps key/mouse events and frame ticks to state mutations.
//!
//! Scroll and resize input never touches the carousel directly.  It moves
//! the page and notifies the frame scheduler; the carousel only updates when
//! [`on_tick`] turns the pending request into a frame.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use tracing::debug;

use crate::config::Action;
use crate::core::frame::FrameReason;
use crate::core::phase::Viewport;

use super::state::AppState;

/// Share of a viewport height moved by page up/down.
const PAGE_FRACTION: f64 = 0.9;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    // Ctrl+c always quits, regardless of bindings.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    // Escape does not count as activation in browsers either.
    if action != Action::Quit && key.code != KeyCode::Esc {
        note_gesture(state);
    }
    apply_action(state, action);
}

pub fn apply_action(state: &mut AppState, action: Action) {
    let step = state.config.preview.scroll_step_px;
    let page = state.page.viewport().height * PAGE_FRACTION;
    match action {
        Action::ScrollDown => scroll_by(state, step),
        Action::ScrollUp => scroll_by(state, -step),
        Action::PageDown => scroll_by(state, page),
        Action::PageUp => scroll_by(state, -page),
        Action::Top => scroll_to(state, 0.0),
        Action::Bottom => {
            let end = state.page.max_scroll();
            scroll_to(state, end);
        }
        Action::ToggleDevice => {
            state.mobile = !state.mobile;
            let viewport = state.config.viewport.viewport(state.mobile);
            resize_page(state, viewport);
        }
        Action::Rotate => {
            let viewport = state.page.viewport().rotated();
            resize_page(state, viewport);
        }
        Action::ToggleMute => state.audio.toggle_mute(),
        Action::ToggleVisibility => {
            state.visible = !state.visible;
            if state.visible {
                state.audio.on_visibility_change(true);
                // Catch up on anything scrolled while hidden.
                state.scheduler.notify(FrameReason::Resize);
            } else {
                state.audio.pause_temporarily();
                state.audio.on_visibility_change(false);
            }
            state.status_message = Some(if state.visible {
                "tab visible".into()
            } else {
                "tab hidden: animation frames paused".into()
            });
        }
        Action::Quit => state.should_quit = true,
    }
}

/// Process a mouse event.  Wheel scrolling is not a user activation; a
/// click is.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    let step = state.config.preview.scroll_step_px;
    match mouse.kind {
        MouseEventKind::ScrollDown => scroll_by(state, step),
        MouseEventKind::ScrollUp => scroll_by(state, -step),
        MouseEventKind::Down(MouseButton::Left) => note_gesture(state),
        _ => {}
    }
}

/// The terminal changed size.  The simulated viewport is unchanged, but the
/// view is re-laid out on the next frame.
pub fn handle_resize(state: &mut AppState) {
    state.scheduler.notify(FrameReason::Resize);
}

/// One animation frame: advance the scroll glide, run at most one carousel
/// frame, then advance media clocks by `dt` seconds.
pub fn on_tick(state: &mut AppState, dt: f64) {
    if let Some(y) = state.scroll.tick() {
        state.page.scroll_to(y);
        state.scheduler.notify(FrameReason::Scroll);
    }

    if state.visible {
        if let Some(tick) = state.scheduler.poll_frame() {
            let anchor = state.page.badge_anchor();
            state.controller.on_frame(&state.page, &mut state.audio, anchor);
            state.last_tick = Some(tick);
        }
    }

    state.controller.advance(dt);
    state.audio.advance(dt);
}

// ── helpers ─────────────────────────────────────────────────────

fn note_gesture(state: &mut AppState) {
    if !state.activation.is_active() {
        debug!("first user gesture");
        state.activation.activate();
    }
    state.audio.note_user_interaction();
}

fn scroll_by(state: &mut AppState, dy: f64) {
    let max = state.page.max_scroll();
    state.scroll.push(dy, max);
    if !state.config.preview.smooth_scroll {
        apply_scroll(state);
    }
}

fn scroll_to(state: &mut AppState, y: f64) {
    let max = state.page.max_scroll();
    state.scroll.set_target(y, max);
    if !state.config.preview.smooth_scroll {
        apply_scroll(state);
    }
}

fn apply_scroll(state: &mut AppState) {
    let y = state.scroll.snap();
    state.page.scroll_to(y);
    state.scheduler.notify(FrameReason::Scroll);
}

fn resize_page(state: &mut AppState, viewport: Viewport) {
    state.page.resize(viewport);
    state.scroll.reset_to(state.page.scroll_y());
    state.scheduler.notify(FrameReason::Resize);
    state.status_message = Some(format!(
        "viewport {:.0}×{:.0}",
        viewport.width, viewport.height
    ));
}
