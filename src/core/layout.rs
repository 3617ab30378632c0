//! Carousel box geometry for each phase.
//!
//! The box grows from a preview card to full-bleed during `ScaleUp`, stays
//! pinned full-bleed through `Sliding`, then shrinks and rounds off into a
//! badge during `ScaleDown`.  Every field is continuous across phase
//! boundaries: a phase's value at local progress `1` is the next phase's
//! value at `0`.

use super::phase::{clamp01, Phase, Viewport};
use super::tuning::{DeviceTuning, Tuning};

/// Layout class, picked from the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    pub fn for_viewport(viewport: Viewport, tuning: &Tuning) -> Self {
        if viewport.width <= tuning.mobile_breakpoint_px {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DeviceClass::Mobile => "mobile",
            DeviceClass::Desktop => "desktop",
        }
    }

    fn tuning(self, tuning: &Tuning) -> &DeviceTuning {
        match self {
            DeviceClass::Mobile => &tuning.mobile,
            DeviceClass::Desktop => &tuning.desktop,
        }
    }
}

/// CSS-style positioning of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// In document flow, scrolling with the page.
    Relative,
    /// Pinned to the viewport.
    Fixed,
}

/// Centre point (viewport pixels) the finished badge docks on, e.g. just
/// above a glyph of the headline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeAnchor {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselLayout {
    /// Width, percent of the viewport width.
    pub width_pct: f64,
    pub height_px: f64,
    pub border_radius_px: f64,
    pub position: Position,
    pub offset_top_px: f64,
    pub offset_left_px: f64,
    /// `None` = stacking order left to the page.
    pub z_index: Option<i32>,
    /// Clips render fully darkened.
    pub silhouette: bool,
}

impl CarouselLayout {
    pub fn width_px(&self, viewport: Viewport) -> f64 {
        self.width_pct / 100.0 * viewport.width
    }

    /// Where the box lands in viewport pixels.  A relative box sits in flow
    /// with its top at `in_flow_top`, centred horizontally.
    pub fn placement(&self, in_flow_top: f64, viewport: Viewport) -> Placement {
        let width = self.width_px(viewport);
        let (left, top) = match self.position {
            Position::Relative => ((viewport.width - width) / 2.0, in_flow_top + self.offset_top_px),
            Position::Fixed => (self.offset_left_px, self.offset_top_px),
        };
        Placement {
            left,
            top,
            width,
            height: self.height_px,
        }
    }

    /// Corner radius as a percentage of the shorter side (50% is a circle).
    pub fn radius_pct(&self, viewport: Viewport) -> f64 {
        let short = self.width_px(viewport).min(self.height_px);
        if short > 0.0 {
            self.border_radius_px / short * 100.0
        } else {
            0.0
        }
    }
}

/// On-screen box, viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// `a` at `t = 0`, exactly `b` at `t = 1`.
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Size of the box when it fills the screen: `(width_pct, height_px)`.
pub fn full_bleed(device: DeviceClass, viewport: Viewport, tuning: &Tuning) -> (f64, f64) {
    let height = match device.tuning(tuning).full_height_ratio {
        Some(ratio) => viewport.height.min(viewport.width * ratio),
        None => viewport.height,
    };
    (100.0, height.max(0.0))
}

/// Morph sub-progress: `0` until `morph_start`, then `0 → 1` over the rest
/// of `ScaleDown`.
pub fn morph_progress(local: f64, tuning: &Tuning) -> f64 {
    if local <= tuning.morph_start {
        0.0
    } else {
        clamp01((local - tuning.morph_start) / (1.0 - tuning.morph_start))
    }
}

/// Compute the carousel box for a phase and its local progress.
pub fn compute_layout(
    phase: Phase,
    local: f64,
    device: DeviceClass,
    viewport: Viewport,
    anchor: Option<BadgeAnchor>,
    tuning: &Tuning,
) -> CarouselLayout {
    let local = clamp01(local);
    let dt = device.tuning(tuning);
    let (full_w, full_h) = full_bleed(device, viewport, tuning);

    match phase {
        Phase::ScaleUp => {
            let docked = local >= 1.0;
            CarouselLayout {
                width_pct: lerp(dt.preview_width_pct, full_w, local),
                height_px: lerp(dt.preview_height_px, full_h, local),
                border_radius_px: dt.preview_radius_px * (1.0 - local),
                position: if docked {
                    Position::Fixed
                } else {
                    Position::Relative
                },
                offset_top_px: 0.0,
                offset_left_px: 0.0,
                z_index: docked.then_some(tuning.docked_z_index),
                silhouette: false,
            }
        }
        Phase::Sliding => CarouselLayout {
            width_pct: full_w,
            height_px: full_h,
            border_radius_px: 0.0,
            position: Position::Fixed,
            offset_top_px: 0.0,
            offset_left_px: 0.0,
            z_index: Some(tuning.docked_z_index),
            silhouette: false,
        },
        Phase::ScaleDown => scale_down(local, dt, full_w, full_h, viewport, anchor, tuning),
    }
}

fn scale_down(
    local: f64,
    dt: &DeviceTuning,
    full_w: f64,
    full_h: f64,
    viewport: Viewport,
    anchor: Option<BadgeAnchor>,
    tuning: &Tuning,
) -> CarouselLayout {
    let vw = if viewport.width > 0.0 { viewport.width } else { 1.0 };

    let height = lerp(full_h, dt.badge_height_px, local);
    let mut width_pct = lerp(full_w, dt.badge_width_pct, local);
    let morph = morph_progress(local, tuning);
    if morph > 0.0 {
        // Pull the width toward the height so the box ends up square.
        width_pct = lerp(width_pct, height / vw * 100.0, morph);
    }
    let width_px = width_pct / 100.0 * vw;
    let radius = morph * width_px.min(height) / 2.0;

    // Centre travels from the full-bleed box's centre to a resting point
    // above the viewport centre, then over the morph to the anchor.
    let start_x = full_w / 100.0 * vw / 2.0;
    let start_y = full_h / 2.0;
    let rest_x = vw / 2.0;
    let rest_y = viewport.height / 2.0 - dt.badge_lift_px;
    let mut cx = lerp(start_x, rest_x, local);
    let mut cy = lerp(start_y, rest_y, local);
    if let Some(anchor) = anchor {
        cx = lerp(cx, anchor.x, morph);
        cy = lerp(cy, anchor.y, morph);
    }

    CarouselLayout {
        width_pct,
        height_px: height,
        border_radius_px: radius,
        position: Position::Fixed,
        offset_top_px: cy - height / 2.0,
        offset_left_px: cx - width_px / 2.0,
        z_index: Some(if local > 0.0 {
            tuning.badge_z_index
        } else {
            tuning.docked_z_index
        }),
        silhouette: local > tuning.silhouette_start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Tuning = Tuning::DEFAULT;
    const EPS: f64 = 1e-9;

    fn viewports() -> [(DeviceClass, Viewport); 4] {
        [
            (DeviceClass::Desktop, Viewport::new(1440.0, 900.0)),
            (DeviceClass::Desktop, Viewport::new(2560.0, 1080.0)),
            (DeviceClass::Mobile, Viewport::new(390.0, 844.0)),
            (DeviceClass::Mobile, Viewport::new(844.0, 390.0)),
        ]
    }

    fn assert_same(a: &CarouselLayout, b: &CarouselLayout) {
        assert!((a.width_pct - b.width_pct).abs() < EPS, "{a:?} vs {b:?}");
        assert!((a.height_px - b.height_px).abs() < EPS, "{a:?} vs {b:?}");
        assert!((a.border_radius_px - b.border_radius_px).abs() < EPS, "{a:?} vs {b:?}");
        assert!((a.offset_top_px - b.offset_top_px).abs() < EPS, "{a:?} vs {b:?}");
        assert!((a.offset_left_px - b.offset_left_px).abs() < EPS, "{a:?} vs {b:?}");
        assert_eq!(a.position, b.position);
        assert_eq!(a.z_index, b.z_index);
        assert_eq!(a.silhouette, b.silhouette);
    }

    #[test]
    fn device_class_breakpoint() {
        assert_eq!(
            DeviceClass::for_viewport(Viewport::new(1024.0, 700.0), &T),
            DeviceClass::Mobile
        );
        assert_eq!(
            DeviceClass::for_viewport(Viewport::new(1025.0, 700.0), &T),
            DeviceClass::Desktop
        );
    }

    #[test]
    fn scale_up_meets_sliding() {
        for (device, vp) in viewports() {
            for anchor in [None, Some(BadgeAnchor { x: 120.0, y: 300.0 })] {
                let end = compute_layout(Phase::ScaleUp, 1.0, device, vp, anchor, &T);
                let start = compute_layout(Phase::Sliding, 0.0, device, vp, anchor, &T);
                assert_same(&end, &start);
            }
        }
    }

    #[test]
    fn sliding_meets_scale_down() {
        for (device, vp) in viewports() {
            for anchor in [None, Some(BadgeAnchor { x: 120.0, y: 300.0 })] {
                let end = compute_layout(Phase::Sliding, 1.0, device, vp, anchor, &T);
                let start = compute_layout(Phase::ScaleDown, 0.0, device, vp, anchor, &T);
                assert_same(&end, &start);
            }
        }
    }

    #[test]
    fn scale_down_has_no_jumps() {
        for (device, vp) in viewports() {
            let anchor = Some(BadgeAnchor {
                x: vp.width * 0.4,
                y: vp.height * 0.3,
            });
            let steps = 10_000;
            let mut prev = compute_layout(Phase::ScaleDown, 0.0, device, vp, anchor, &T);
            for i in 1..=steps {
                let local = i as f64 / steps as f64;
                let cur = compute_layout(Phase::ScaleDown, local, device, vp, anchor, &T);
                assert!((cur.width_pct - prev.width_pct).abs() < 0.1, "local = {local}");
                assert!((cur.height_px - prev.height_px).abs() < 1.0, "local = {local}");
                assert!((cur.offset_top_px - prev.offset_top_px).abs() < 1.0);
                assert!((cur.offset_left_px - prev.offset_left_px).abs() < 1.0);
                assert!((cur.border_radius_px - prev.border_radius_px).abs() < 1.0);
                prev = cur;
            }
        }
    }

    #[test]
    fn badge_ends_as_circle_on_anchor() {
        let vp = Viewport::new(1440.0, 900.0);
        let anchor = BadgeAnchor { x: 700.0, y: 250.0 };
        let l = compute_layout(Phase::ScaleDown, 1.0, DeviceClass::Desktop, vp, Some(anchor), &T);
        assert!((l.height_px - 40.0).abs() < EPS);
        assert!((l.width_px(vp) - 40.0).abs() < EPS);
        assert!((l.radius_pct(vp) - 50.0).abs() < EPS);
        assert!((l.offset_left_px + 20.0 - 700.0).abs() < EPS);
        assert!((l.offset_top_px + 20.0 - 250.0).abs() < EPS);
        assert_eq!(l.position, Position::Fixed);
        assert_eq!(l.z_index, Some(1001));
        assert!(l.silhouette);
    }

    #[test]
    fn badge_without_anchor_rests_above_centre() {
        let vp = Viewport::new(1440.0, 900.0);
        let l = compute_layout(Phase::ScaleDown, 1.0, DeviceClass::Desktop, vp, None, &T);
        let cx = l.offset_left_px + l.width_px(vp) / 2.0;
        let cy = l.offset_top_px + l.height_px / 2.0;
        assert!((cx - 720.0).abs() < EPS);
        assert!((cy - (450.0 - 150.0)).abs() < EPS);
    }

    #[test]
    fn morph_only_in_tail() {
        assert_eq!(morph_progress(0.5, &T), 0.0);
        assert_eq!(morph_progress(0.7, &T), 0.0);
        assert!((morph_progress(0.85, &T) - 0.5).abs() < 1e-9);
        assert_eq!(morph_progress(1.0, &T), 1.0);

        let vp = Viewport::new(1440.0, 900.0);
        let before = compute_layout(Phase::ScaleDown, 0.6, DeviceClass::Desktop, vp, None, &T);
        assert_eq!(before.border_radius_px, 0.0);
    }

    #[test]
    fn scale_up_starts_at_preview() {
        let vp = Viewport::new(1440.0, 900.0);
        let l = compute_layout(Phase::ScaleUp, 0.0, DeviceClass::Desktop, vp, None, &T);
        assert_eq!(l.width_pct, 65.0);
        assert_eq!(l.height_px, 300.0);
        assert_eq!(l.border_radius_px, 20.0);
        assert_eq!(l.position, Position::Relative);
        assert_eq!(l.z_index, None);

        let half = compute_layout(Phase::ScaleUp, 0.5, DeviceClass::Desktop, vp, None, &T);
        assert!((half.width_pct - 82.5).abs() < EPS);
        assert!((half.height_px - 600.0).abs() < EPS);
    }

    #[test]
    fn mobile_full_bleed_height_is_bounded() {
        let tall = Viewport::new(390.0, 900.0);
        let (w, h) = full_bleed(DeviceClass::Mobile, tall, &T);
        assert_eq!(w, 100.0);
        assert!((h - 390.0 * 16.0 / 9.0).abs() < EPS);

        let (_, desktop_h) = full_bleed(DeviceClass::Desktop, tall, &T);
        assert_eq!(desktop_h, 900.0);
    }

    #[test]
    fn silhouette_after_threshold() {
        let vp = Viewport::new(1440.0, 900.0);
        let l = |local| compute_layout(Phase::ScaleDown, local, DeviceClass::Desktop, vp, None, &T);
        assert!(!l(0.3).silhouette);
        assert!(l(0.31).silhouette);
    }

    #[test]
    fn placement_follows_position() {
        let vp = Viewport::new(1000.0, 800.0);
        let preview = compute_layout(Phase::ScaleUp, 0.0, DeviceClass::Desktop, vp, None, &T);
        let p = preview.placement(420.0, vp);
        assert!((p.left - 175.0).abs() < EPS);
        assert!((p.top - 420.0).abs() < EPS);
        assert!((p.width - 650.0).abs() < EPS);

        let pinned = compute_layout(Phase::Sliding, 0.5, DeviceClass::Desktop, vp, None, &T);
        let p = pinned.placement(-3000.0, vp);
        assert_eq!((p.left, p.top, p.width, p.height), (0.0, 0.0, 1000.0, 800.0));
    }
}
