//! Background-audio ducking while the carousel plays clips with sound.
//!
//! Phase is recomputed every frame, but the duck itself is edge-triggered:
//! a latch records whether the carousel currently holds it, so pause and
//! resume each fire exactly once per `Sliding` visit however many frames
//! the visit spans.

use tracing::info;

use super::ambient::BackgroundAudio;
use super::media::MediaElement;
use super::phase::Phase;
use super::pool::VideoElementPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioState {
    /// Background track untouched by the carousel.
    AudioActive,
    /// Carousel holds the background track paused.
    AudioSuppressed,
}

/// What a frame's observation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuckingTransition {
    Unchanged,
    Suppressed,
    /// Track handed back; `force_muted` clips were still audible.
    Restored { force_muted: usize },
}

#[derive(Debug, Default)]
pub struct DuckingCoordinator {
    suppressed: bool,
}

impl DuckingCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AudioState {
        if self.suppressed {
            AudioState::AudioSuppressed
        } else {
            AudioState::AudioActive
        }
    }

    /// Feed one frame's phase.  Ducks on entering `Sliding`; on leaving it,
    /// hands the track back and mutes every clip except `active`.
    pub fn observe<E: MediaElement>(
        &mut self,
        phase: Phase,
        active: usize,
        audio: &mut dyn BackgroundAudio,
        pool: &mut VideoElementPool<E>,
    ) -> DuckingTransition {
        let sliding = phase == Phase::Sliding;
        if sliding && !self.suppressed {
            info!("carousel sliding: ducking background audio");
            audio.duck();
            self.suppressed = true;
            DuckingTransition::Suppressed
        } else if !sliding && self.suppressed {
            info!(phase = phase.label(), "carousel left sliding: restoring background audio");
            audio.release_duck();
            self.suppressed = false;
            let force_muted = pool.force_mute_except(active);
            DuckingTransition::Restored { force_muted }
        } else {
            DuckingTransition::Unchanged
        }
    }

    /// Hand back a held duck (teardown).  Returns whether one was held.
    pub fn reset(&mut self, audio: &mut dyn BackgroundAudio) -> bool {
        if !self.suppressed {
            return false;
        }
        audio.release_duck();
        self.suppressed = false;
        true
    }
}
