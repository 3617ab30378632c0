//! Headless sweep: scroll the page top to bottom in even steps and print one
//! line per frame.  Useful for eyeballing the phase/layout tables and for
//! diffing tuning changes.

use std::io::{self, Write};

use crate::core::ambient::AudioSnapshot;
use crate::core::controller::CarouselFrame;
use crate::core::frame::FrameReason;
use crate::core::layout::Position;

use super::handler;
use super::state::AppState;

pub const HEADER: &str =
    "frame  scroll_y  progress  phase       local  clip  width%  height  radius%  position  z     silhouette  audio";

/// Run `steps + 1` frames spread evenly over the page and write the table.
pub fn run(state: &mut AppState, steps: usize, out: &mut impl Write) -> io::Result<()> {
    let steps = steps.max(1);
    let dt = state.config.preview.frame_interval_ms as f64 / 1000.0;
    let max = state.page.max_scroll();

    writeln!(out, "{HEADER}")?;
    for i in 0..=steps {
        let y = max * i as f64 / steps as f64;
        state.page.scroll_to(y);
        state.scroll.reset_to(state.page.scroll_y());
        state.scheduler.notify(FrameReason::Scroll);
        handler::on_tick(state, dt);

        let Some(frame) = state.controller.last_frame() else {
            continue;
        };
        let audio = *state.audio_status.borrow();
        writeln!(out, "{}", format_row(i, state.page.scroll_y(), frame, &audio))?;
    }
    Ok(())
}

fn format_row(index: usize, scroll_y: f64, frame: &CarouselFrame, audio: &AudioSnapshot) -> String {
    let layout = &frame.layout;
    let viewport = frame.geometry.viewport;
    let position = match layout.position {
        Position::Relative => "relative",
        Position::Fixed => "fixed",
    };
    let z = layout
        .z_index
        .map_or_else(|| "auto".to_string(), |z| z.to_string());
    format!(
        "{index:>5}  {scroll_y:>8.0}  {:>8.3}  {:<10}  {:>5.3}  {:>4}  {:>6.1}  {:>6.0}  {:>7.1}  {position:<8}  {z:<4}  {:<10}  {}",
        frame.sample.progress,
        frame.sample.phase.label(),
        frame.sample.local,
        frame.active,
        layout.width_pct,
        layout.height_px,
        layout.radius_pct(viewport),
        layout.silhouette,
        audio.label(),
    )
}
