//! Active-clip selection and the per-clip slide transform.

use super::phase::Phase;

/// Pick the clip that is "active" for a phase and its local progress.
///
/// `ScaleUp` pins the first clip and `ScaleDown` the last; during `Sliding`
/// the local progress is split into `count` equal buckets.  A local progress
/// of exactly `1.0` lands in the last bucket rather than one past it.
pub fn select_index(phase: Phase, local: f64, count: usize) -> usize {
    let last = count.saturating_sub(1);
    match phase {
        Phase::ScaleUp => 0,
        Phase::ScaleDown => last,
        Phase::Sliding => {
            let local = if local.is_finite() { local.max(0.0) } else { 0.0 };
            let bucket = (local * count as f64).floor() as usize;
            bucket.min(last)
        }
    }
}

/// Where a clip sits inside the carousel relative to the active one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideTransform {
    /// Horizontal offset, percent of the carousel width.
    pub translate_x_pct: f64,
    pub scale_x: f64,
    pub opacity: f64,
}

impl SlideTransform {
    const SHOWN: Self = Self {
        translate_x_pct: 0.0,
        scale_x: 1.0,
        opacity: 1.0,
    };

    fn hidden_at(translate_x_pct: f64) -> Self {
        Self {
            translate_x_pct,
            scale_x: 0.0,
            opacity: 0.0,
        }
    }
}

/// Accordion transform for clip `index` while `active` is showing.
///
/// Only `Sliding` moves clips sideways: neighbours fold in from half a width
/// away, everything further out waits a full width off-stage.  In the other
/// phases the inactive clips are simply invisible.
pub fn slide_transform(index: usize, active: usize, phase: Phase) -> SlideTransform {
    if index == active {
        return SlideTransform::SHOWN;
    }
    match phase {
        Phase::ScaleUp | Phase::ScaleDown => SlideTransform {
            translate_x_pct: 0.0,
            scale_x: 1.0,
            opacity: 0.0,
        },
        Phase::Sliding => {
            if index + 1 == active {
                SlideTransform::hidden_at(-50.0)
            } else if index == active + 1 {
                SlideTransform::hidden_at(50.0)
            } else if index < active {
                SlideTransform::hidden_at(-100.0)
            } else {
                SlideTransform::hidden_at(100.0)
            }
        }
    }
}
