//! Scroll progress and phase classification.
//!
//! The Wishes container is several viewports tall.  How far the page has
//! scrolled through it is normalised to a progress value in `[0, 1]`, which
//! is then split into three adjacent phases.  Phase is recomputed from
//! scratch on every frame; nothing here remembers the previous one.

use super::tuning::Tuning;

// ───────────────────────────────────────── geometry ──────────

/// Layout of the scroll container, read from the page every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Container top edge relative to the viewport top (negative once
    /// scrolled past).
    pub container_top: f64,
    pub container_height: f64,
    pub viewport_height: f64,
}

/// Visible area of the page, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Swap width and height (orientation change).
    pub fn rotated(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

/// Everything the controller reads from layout for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    pub metrics: ScrollMetrics,
    /// Carousel top edge relative to the viewport top.
    pub carousel_top: f64,
    pub viewport: Viewport,
}

// ───────────────────────────────────────── phases ────────────

/// The three mutually exclusive scroll ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Carousel grows from a preview box toward full-bleed.
    ScaleUp,
    /// Full-bleed; scrolling slides between clips.
    Sliding,
    /// Carousel shrinks into a circular badge.
    ScaleDown,
}

impl Phase {
    /// Classify a container progress value.  Lower bounds are closed, so the
    /// threshold values themselves belong to the later phase.
    pub fn from_progress(progress: f64, tuning: &Tuning) -> Self {
        if progress < tuning.scale_up_end {
            Phase::ScaleUp
        } else if progress < tuning.scale_down_start {
            Phase::Sliding
        } else {
            Phase::ScaleDown
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::ScaleUp => "scale-up",
            Phase::Sliding => "sliding",
            Phase::ScaleDown => "scale-down",
        }
    }
}

/// Result of sampling the scroll position for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSample {
    /// Container progress in `[0, 1]`.
    pub progress: f64,
    pub phase: Phase,
    /// Progress renormalised to `[0, 1]` within the current phase.
    pub local: f64,
}

impl PhaseSample {
    /// The sample used before the page is laid out.
    pub const REST: Self = Self {
        progress: 0.0,
        phase: Phase::ScaleUp,
        local: 0.0,
    };
}

pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Container scroll progress.
///
/// A container no taller than the viewport has nothing to scroll through and
/// always reports `0`.
pub fn progress(metrics: &ScrollMetrics) -> f64 {
    let range = metrics.container_height - metrics.viewport_height;
    if !range.is_finite() || range <= 0.0 || !metrics.container_top.is_finite() {
        return 0.0;
    }
    let scrolled = (-metrics.container_top).max(0.0);
    clamp01(scrolled / range)
}

/// Entrance progress of the carousel box itself, used as the ScaleUp-local
/// progress.  Starts when the box's top edge reaches the bottom of the
/// viewport and completes `entrance_overshoot` viewports above the top.
pub fn entrance_progress(carousel_top: f64, viewport_height: f64, tuning: &Tuning) -> f64 {
    if !(viewport_height.is_finite() && viewport_height > 0.0) || carousel_top > viewport_height {
        return 0.0;
    }
    let travel = viewport_height * (1.0 + tuning.entrance_overshoot);
    clamp01((viewport_height - carousel_top) / travel)
}

/// Sample progress, phase and phase-local progress from one frame's geometry.
pub fn sample(geometry: &FrameGeometry, tuning: &Tuning) -> PhaseSample {
    let progress = progress(&geometry.metrics);
    let phase = Phase::from_progress(progress, tuning);
    let local = match phase {
        Phase::ScaleUp => entrance_progress(
            geometry.carousel_top,
            geometry.metrics.viewport_height,
            tuning,
        ),
        Phase::Sliding => clamp01((progress - tuning.scale_up_end) / tuning.sliding_span()),
        Phase::ScaleDown => {
            clamp01((progress - tuning.scale_down_start) / tuning.scale_down_span())
        }
    };
    PhaseSample {
        progress,
        phase,
        local,
    }
}
