//! The carousel's tuning table.
//!
//! Every threshold and size the phase, layout and playback code reads lives
//! here, so continuity can be checked against one source of truth.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-device-class size constants.  A device table in the config file must
/// be given in full.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceTuning {
    /// Width of the resting preview box, percent of viewport width.
    pub preview_width_pct: f64,
    /// Height of the resting preview box.
    pub preview_height_px: f64,
    /// Corner radius of the preview box; shrinks to 0 as it grows.
    pub preview_radius_px: f64,
    /// Width the box shrinks to before the morph takes over.
    pub badge_width_pct: f64,
    /// Final badge height (and diameter once the morph completes).
    pub badge_height_px: f64,
    /// How far above the viewport centre the shrinking box comes to rest.
    pub badge_lift_px: f64,
    /// Caps the full-bleed height at `viewport_width * ratio`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_height_ratio: Option<f64>,
}

impl DeviceTuning {
    pub const DESKTOP: Self = Self {
        preview_width_pct: 65.0,
        preview_height_px: 300.0,
        preview_radius_px: 20.0,
        badge_width_pct: 5.0,
        badge_height_px: 40.0,
        badge_lift_px: 150.0,
        full_height_ratio: None,
    };

    pub const MOBILE: Self = Self {
        preview_width_pct: 90.0,
        preview_height_px: 220.0,
        preview_radius_px: 20.0,
        badge_width_pct: 5.0,
        badge_height_px: 20.0,
        badge_lift_px: 90.0,
        full_height_ratio: Some(16.0 / 9.0),
    };
}

/// Scroll thresholds, morph timing, stacking order and playback volumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Container progress at which `ScaleUp` ends and `Sliding` begins.
    pub scale_up_end: f64,
    /// Container progress at which `Sliding` ends and `ScaleDown` begins.
    pub scale_down_start: f64,
    /// Entrance completes this fraction of a viewport above the top edge.
    pub entrance_overshoot: f64,
    /// ScaleDown-local progress where the rectangle starts turning round.
    pub morph_start: f64,
    /// ScaleDown-local progress after which clips render as a silhouette.
    pub silhouette_start: f64,
    /// ScaleDown-local progress after which the active clip is paused.
    pub late_pause_start: f64,
    /// Viewports at most this wide are laid out as mobile.
    pub mobile_breakpoint_px: f64,
    pub docked_z_index: i32,
    pub badge_z_index: i32,
    /// Volume of the clip playing during `Sliding`.
    pub featured_volume: f64,
    /// Volume of the page's background track.
    pub ambient_volume: f64,
    pub desktop: DeviceTuning,
    pub mobile: DeviceTuning,
}

impl Tuning {
    pub const DEFAULT: Self = Self {
        scale_up_end: 0.25,
        scale_down_start: 0.65,
        entrance_overshoot: 0.2,
        morph_start: 0.7,
        silhouette_start: 0.3,
        late_pause_start: 0.5,
        mobile_breakpoint_px: 1024.0,
        docked_z_index: 1000,
        badge_z_index: 1001,
        featured_volume: 0.5,
        ambient_volume: 0.3,
        desktop: DeviceTuning::DESKTOP,
        mobile: DeviceTuning::MOBILE,
    };

    /// Width of the `Sliding` range in container progress.
    pub fn sliding_span(&self) -> f64 {
        self.scale_down_start - self.scale_up_end
    }

    /// Width of the `ScaleDown` range in container progress.
    pub fn scale_down_span(&self) -> f64 {
        1.0 - self.scale_down_start
    }

    /// Check the ordering and positivity constraints the phase and layout
    /// code relies on.
    pub fn validate(&self) -> Result<(), TuningError> {
        let unit = |v: f64| v.is_finite() && (0.0..1.0).contains(&v);

        if !(unit(self.scale_up_end)
            && unit(self.scale_down_start)
            && self.scale_up_end > 0.0
            && self.scale_up_end < self.scale_down_start)
        {
            return Err(TuningError::Thresholds {
                scale_up_end: self.scale_up_end,
                scale_down_start: self.scale_down_start,
            });
        }
        for (name, value) in [
            ("morph_start", self.morph_start),
            ("silhouette_start", self.silhouette_start),
            ("late_pause_start", self.late_pause_start),
        ] {
            if !unit(value) {
                return Err(TuningError::OutOfUnitRange { name, value });
            }
        }
        if !(self.entrance_overshoot.is_finite() && self.entrance_overshoot >= 0.0) {
            return Err(TuningError::NotPositive {
                name: "entrance_overshoot",
                value: self.entrance_overshoot,
            });
        }
        for (name, value) in [
            ("featured_volume", self.featured_volume),
            ("ambient_volume", self.ambient_volume),
        ] {
            if !(value.is_finite() && (0.0..=1.0).contains(&value)) {
                return Err(TuningError::OutOfUnitRange { name, value });
            }
        }
        self.desktop.validate()?;
        self.mobile.validate()
    }
}

impl DeviceTuning {
    fn validate(&self) -> Result<(), TuningError> {
        for (name, value) in [
            ("preview_width_pct", self.preview_width_pct),
            ("preview_height_px", self.preview_height_px),
            ("badge_width_pct", self.badge_width_pct),
            ("badge_height_px", self.badge_height_px),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::NotPositive { name, value });
            }
        }
        for (name, value) in [
            ("preview_radius_px", self.preview_radius_px),
            ("badge_lift_px", self.badge_lift_px),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::NotPositive { name, value });
            }
        }
        if let Some(ratio) = self.full_height_ratio {
            if !(ratio.is_finite() && ratio > 0.0) {
                return Err(TuningError::NotPositive {
                    name: "full_height_ratio",
                    value: ratio,
                });
            }
        }
        Ok(())
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    #[error("phase thresholds must satisfy 0 < scale_up_end ({scale_up_end}) < scale_down_start ({scale_down_start}) < 1")]
    Thresholds {
        scale_up_end: f64,
        scale_down_start: f64,
    },
    #[error("{name} must lie in the unit interval, got {value}")]
    OutOfUnitRange { name: &'static str, value: f64 },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
}
