//! A virtual page hosting the Wishes section.
//!
//! The terminal preview has no browser layout engine, so the page is
//! modelled directly: some lead-in content, the tall scroll container with
//! the carousel some way below its top, and some trailing content.
//! [`VirtualPage`] answers [`LayoutProbe`] queries from its current scroll
//! offset and viewport, exactly like re-reading bounding boxes each frame.

use serde::{Deserialize, Serialize};

use super::frame::LayoutProbe;
use super::layout::BadgeAnchor;
use super::phase::{FrameGeometry, ScrollMetrics, Viewport};
use super::tuning::Tuning;

/// Static shape of the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Height of everything above the container.
    pub lead_in_px: f64,
    /// Container height in viewport heights.
    pub container_height_vh: f64,
    /// Distance from the container top to the carousel's top edge, in
    /// viewport heights.
    pub carousel_offset_vh: f64,
    /// Height of everything below the container.
    pub tail_px: f64,
    /// Badge dock point as fractions of the viewport (the dot of the `i`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_x_frac: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_y_frac: Option<f64>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            lead_in_px: 900.0,
            container_height_vh: 4.0,
            carousel_offset_vh: 0.4,
            tail_px: 600.0,
            anchor_x_frac: Some(0.47),
            anchor_y_frac: Some(0.3),
        }
    }
}

impl PageConfig {
    /// Largest carousel offset whose entrance completes by the time the
    /// container reaches `scale_up_end`.  Any lower placement makes the box
    /// jump when Sliding takes over.  `None` when the container never
    /// leaves ScaleUp.
    pub fn max_carousel_offset_vh(&self, tuning: &Tuning) -> Option<f64> {
        let scroll_vh = self.container_height_vh - 1.0;
        (scroll_vh > 0.0).then(|| tuning.scale_up_end * scroll_vh - tuning.entrance_overshoot)
    }
}

#[derive(Debug, Clone)]
pub struct VirtualPage {
    config: PageConfig,
    viewport: Viewport,
    scroll_y: f64,
    mounted: bool,
}

impl VirtualPage {
    pub fn new(config: PageConfig, viewport: Viewport) -> Self {
        Self {
            config,
            viewport,
            scroll_y: 0.0,
            mounted: true,
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn container_height(&self) -> f64 {
        (self.config.container_height_vh * self.viewport.height).max(0.0)
    }

    pub fn page_height(&self) -> f64 {
        self.config.lead_in_px + self.container_height() + self.config.tail_px
    }

    pub fn max_scroll(&self) -> f64 {
        (self.page_height() - self.viewport.height).max(0.0)
    }

    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = if y.is_finite() {
            y.clamp(0.0, self.max_scroll())
        } else {
            0.0
        };
    }

    /// Scroll offset at which the container reports `progress`.
    #[cfg(test)]
    pub fn scroll_for_progress(&self, progress: f64) -> f64 {
        let range = (self.container_height() - self.viewport.height).max(0.0);
        self.config.lead_in_px + progress.clamp(0.0, 1.0) * range
    }

    /// New viewport (window resize, orientation change).  The scroll offset
    /// is kept and re-clamped, as a browser does.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.scroll_to(self.scroll_y);
    }

    /// Simulate the section being (un)mounted.
    #[cfg(test)]
    pub fn set_mounted(&mut self, mounted: bool) {
        self.mounted = mounted;
    }

    /// Where the finished badge docks, if the page has a dock glyph.
    pub fn badge_anchor(&self) -> Option<BadgeAnchor> {
        match (self.config.anchor_x_frac, self.config.anchor_y_frac) {
            (Some(x), Some(y)) => Some(BadgeAnchor {
                x: x * self.viewport.width,
                y: y * self.viewport.height,
            }),
            _ => None,
        }
    }
}

impl LayoutProbe for VirtualPage {
    fn geometry(&self) -> Option<FrameGeometry> {
        if !self.mounted {
            return None;
        }
        let container_top = self.config.lead_in_px - self.scroll_y;
        Some(FrameGeometry {
            metrics: ScrollMetrics {
                container_top,
                container_height: self.container_height(),
                viewport_height: self.viewport.height,
            },
            carousel_top: container_top + self.config.carousel_offset_vh * self.viewport.height,
            viewport: self.viewport,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::phase::progress;

    fn page() -> VirtualPage {
        VirtualPage::new(PageConfig::default(), Viewport::new(1440.0, 1000.0))
    }

    #[test]
    fn scroll_is_clamped_to_page() {
        let mut p = page();
        p.scroll_to(-50.0);
        assert_eq!(p.scroll_y(), 0.0);
        p.scroll_to(1e9);
        assert_eq!(p.scroll_y(), p.max_scroll());
        assert_eq!(p.max_scroll(), 900.0 + 4000.0 + 600.0 - 1000.0);
    }

    #[test]
    fn progress_targets_round_trip() {
        let mut p = page();
        for target in [0.0, 0.25, 0.5, 0.65, 1.0] {
            p.scroll_to(p.scroll_for_progress(target));
            let g = p.geometry().unwrap();
            assert!((progress(&g.metrics) - target).abs() < 1e-9);
        }
    }

    #[test]
    fn resize_reclamps_scroll() {
        let mut p = page();
        p.scroll_to(p.max_scroll());
        p.resize(Viewport::new(1440.0, 500.0));
        assert_eq!(p.scroll_y(), p.max_scroll());
        assert_eq!(p.container_height(), 2000.0);
    }

    #[test]
    fn unmounted_page_has_no_geometry() {
        let mut p = page();
        p.set_mounted(false);
        assert!(p.geometry().is_none());
    }

    #[test]
    fn anchor_follows_viewport() {
        let p = page();
        let a = p.badge_anchor().unwrap();
        assert!((a.x - 0.47 * 1440.0).abs() < 1e-9);
        assert!((a.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn carousel_offset_scales_with_viewport() {
        let mut p = page();
        p.scroll_to(900.0);
        assert!((p.geometry().unwrap().carousel_top - 400.0).abs() < 1e-9);
        p.resize(Viewport::new(390.0, 844.0));
        assert!((p.geometry().unwrap().carousel_top - 0.4 * 844.0).abs() < 1e-9);
    }

    #[test]
    fn default_offset_fits_the_entrance() {
        let config = PageConfig::default();
        let limit = config.max_carousel_offset_vh(&Tuning::DEFAULT).unwrap();
        assert!((limit - 0.55).abs() < 1e-9);
        assert!(config.carousel_offset_vh <= limit);

        let short = PageConfig {
            container_height_vh: 1.0,
            ..config
        };
        assert_eq!(short.max_carousel_offset_vh(&Tuning::DEFAULT), None);
    }
}
