//! One-line readout of the last carousel frame.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Paragraph, Widget},
};

use crate::core::{
    ambient::AudioSnapshot, controller::CarouselFrame, ducking::AudioState, frame::FrameTick,
};

use super::theme::Theme;

pub struct FrameInfo<'a> {
    pub frame: Option<&'a CarouselFrame>,
    pub clips: usize,
    /// Clips with data loaded.
    pub buffered: usize,
    pub tick: Option<FrameTick>,
    pub superseded: u64,
    pub audio: AudioSnapshot,
    pub visible: bool,
}

impl FrameInfo<'_> {
    pub fn text(&self) -> String {
        let Some(frame) = self.frame else {
            return " waiting for first frame".into();
        };
        let vp = frame.geometry.viewport;
        let mut parts = vec![
            format!(
                " {} {:.2} (p {:.3})",
                frame.sample.phase.label(),
                frame.sample.local,
                frame.sample.progress
            ),
            format!("clip {}/{} ({} buffered)", frame.active + 1, self.clips, self.buffered),
            format!("{} {:.0}×{:.0}", frame.device.label(), vp.width, vp.height),
            format!("bg audio: {}", self.audio.label()),
        ];
        if frame.ducking == AudioState::AudioSuppressed {
            parts.push("carousel has the floor".into());
        }
        if let Some(tick) = self.tick {
            parts.push(format!(
                "frame #{} ({} coalesced, {} superseded)",
                tick.index, tick.coalesced, self.superseded
            ));
        }
        if !self.visible {
            parts.push("hidden".into());
        }
        parts.join(" · ")
    }
}

impl Widget for FrameInfo<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.text())
            .style(Theme::info_bar_style())
            .render(area, buf);
    }
}
