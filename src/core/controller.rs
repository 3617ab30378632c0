//! Per-frame orchestration of the carousel.
//!
//! [`CarouselController::on_frame`] is the only entry point that mutates
//! playback.  It reads geometry through a [`LayoutProbe`] at frame time and
//! then runs, in order: phase sampling, index selection, layout, ducking and
//! pool reconciliation.  Each frame is computed from the geometry of that
//! frame alone, so nothing from an earlier scroll position leaks through.

use tracing::debug;

use super::ambient::BackgroundAudio;
use super::ducking::{AudioState, DuckingCoordinator, DuckingTransition};
use super::frame::LayoutProbe;
use super::index::{slide_transform, SlideTransform};
use super::layout::{compute_layout, BadgeAnchor, CarouselLayout, DeviceClass};
use super::media::{MediaElement, SimulatedMedia};
use super::phase::{sample, FrameGeometry, PhaseSample};
use super::pool::VideoElementPool;
use super::tuning::Tuning;
use super::video::VideoDescriptor;

/// Everything one frame decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselFrame {
    pub sample: PhaseSample,
    pub active: usize,
    pub device: DeviceClass,
    /// Geometry the frame was computed from.
    pub geometry: FrameGeometry,
    pub layout: CarouselLayout,
    pub ducking: AudioState,
    pub transition: DuckingTransition,
}

#[derive(Debug)]
pub struct CarouselController<E> {
    tuning: Tuning,
    videos: Vec<VideoDescriptor>,
    pool: VideoElementPool<E>,
    ducking: DuckingCoordinator,
    last: Option<CarouselFrame>,
    disposed: bool,
}

impl<E: MediaElement> CarouselController<E> {
    /// Build one element per clip with `make_element`.
    pub fn new(
        tuning: Tuning,
        videos: Vec<VideoDescriptor>,
        make_element: impl FnMut(&VideoDescriptor) -> E,
    ) -> Self {
        let pool = VideoElementPool::new(videos.iter().map(make_element));
        Self {
            tuning,
            videos,
            pool,
            ducking: DuckingCoordinator::new(),
            last: None,
            disposed: false,
        }
    }

    pub fn videos(&self) -> &[VideoDescriptor] {
        &self.videos
    }

    pub fn pool(&self) -> &VideoElementPool<E> {
        &self.pool
    }

    pub fn last_frame(&self) -> Option<&CarouselFrame> {
        self.last.as_ref()
    }

    /// Run one frame.  Returns `None`, changing nothing, when the probe has
    /// no layout or the controller was disposed.
    pub fn on_frame(
        &mut self,
        probe: &dyn LayoutProbe,
        audio: &mut dyn BackgroundAudio,
        anchor: Option<BadgeAnchor>,
    ) -> Option<&CarouselFrame> {
        if self.disposed {
            return None;
        }
        let Some(geometry) = probe.geometry() else {
            debug!("frame skipped: layout not mounted");
            return None;
        };

        let sample = sample(&geometry, &self.tuning);
        let active = self.pool.active_for(&sample);
        let device = DeviceClass::for_viewport(geometry.viewport, &self.tuning);
        let layout = compute_layout(
            sample.phase,
            sample.local,
            device,
            geometry.viewport,
            anchor,
            &self.tuning,
        );
        let transition = self.ducking.observe(sample.phase, active, audio, &mut self.pool);
        self.pool.reconcile(&sample, active, &self.tuning);

        debug!(
            progress = sample.progress,
            phase = sample.phase.label(),
            local = sample.local,
            active,
            device = device.label(),
            "carousel frame"
        );

        self.last = Some(CarouselFrame {
            sample,
            active,
            device,
            geometry,
            layout,
            ducking: self.ducking.state(),
            transition,
        });
        self.last.as_ref()
    }

    /// Slide transforms of every clip for the last frame.
    pub fn slide_transforms(&self) -> Vec<SlideTransform> {
        let (active, phase) = self
            .last
            .map_or((0, PhaseSample::REST.phase), |f| (f.active, f.sample.phase));
        (0..self.videos.len())
            .map(|i| slide_transform(i, active, phase))
            .collect()
    }

    /// Advance every clip's clock.
    pub fn advance(&mut self, dt: f64) {
        self.pool.advance(dt);
    }

    /// Hand back any duck and silence every clip.  Later frames are ignored.
    pub fn dispose(&mut self, audio: &mut dyn BackgroundAudio) {
        if self.disposed {
            return;
        }
        self.ducking.reset(audio);
        self.pool.park_all();
        self.disposed = true;
    }
}

impl CarouselController<SimulatedMedia> {
    /// Clips whose element has loaded data.
    pub fn buffered(&self) -> usize {
        (0..self.pool.len())
            .filter(|&i| self.pool.element(i).is_some_and(SimulatedMedia::is_loaded))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::AppConfig;
    use crate::core::frame::{FrameReason, FrameScheduler};
    use crate::core::layout::Position;
    use crate::core::page::{PageConfig, VirtualPage};
    use crate::core::phase::{Phase, ScrollMetrics, Viewport};
    use crate::core::pool::tests::CountingMedia;
    use crate::core::pool::SlotRole;
    use crate::core::video::default_videos;

    #[derive(Debug, Default)]
    struct CountingAudio {
        pauses: u32,
        resumes: u32,
    }

    impl BackgroundAudio for CountingAudio {
        fn duck(&mut self) {
            self.pauses += 1;
        }
        fn release_duck(&mut self) {
            self.resumes += 1;
        }
    }

    struct Unmounted;

    impl LayoutProbe for Unmounted {
        fn geometry(&self) -> Option<FrameGeometry> {
            None
        }
    }

    fn eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn controller() -> CarouselController<CountingMedia> {
        CarouselController::new(Tuning::DEFAULT, default_videos(), |_| CountingMedia::fresh())
    }

    fn page() -> VirtualPage {
        VirtualPage::new(PageConfig::default(), Viewport::new(1440.0, 1000.0))
    }

    #[test]
    fn seven_clip_walkthrough() {
        let mut c = controller();
        let mut audio = CountingAudio::default();
        let mut p = page();

        p.scroll_to(p.scroll_for_progress(0.25));
        let f = *c.on_frame(&p, &mut audio, None).unwrap();
        assert_eq!(f.sample.phase, Phase::Sliding);
        assert!(eq(f.sample.local, 0.0));
        assert_eq!(f.active, 0);
        assert_eq!(f.ducking, AudioState::AudioSuppressed);
        assert_eq!(c.pool().role(0), Some(SlotRole::Featured));

        p.scroll_to(p.scroll_for_progress(0.507));
        let f = *c.on_frame(&p, &mut audio, None).unwrap();
        assert!((f.sample.local - 0.6425).abs() < 1e-6);
        assert_eq!(f.active, 4);
        assert_eq!(c.pool().role(4), Some(SlotRole::Featured));
        assert_eq!(c.pool().role(0), Some(SlotRole::Parked));
        assert_eq!(audio.pauses, 1);
        assert_eq!(audio.resumes, 0);

        p.scroll_to(p.max_scroll());
        let f = *c.on_frame(&p, &mut audio, None).unwrap();
        assert_eq!(f.sample.phase, Phase::ScaleDown);
        assert_eq!(f.active, 6);
        assert_eq!(audio.resumes, 1);
    }

    #[test]
    fn rapid_reversal_applies_final_position_only() {
        let mut c = controller();
        let mut audio = CountingAudio::default();
        let mut p = page();
        let mut scheduler = FrameScheduler::attach();

        p.scroll_to(p.scroll_for_progress(0.2));
        scheduler.poll_frame();
        c.on_frame(&p, &mut audio, None);

        // Down into Sliding and back out again before the next frame.
        p.scroll_to(p.scroll_for_progress(0.4));
        scheduler.notify(FrameReason::Scroll);
        p.scroll_to(p.scroll_for_progress(0.22));
        scheduler.notify(FrameReason::Scroll);

        let tick = scheduler.poll_frame().unwrap();
        assert_eq!(tick.coalesced, 2);
        let f = *c.on_frame(&p, &mut audio, None).unwrap();
        assert_eq!(f.sample.phase, Phase::ScaleUp);
        assert_eq!(audio.pauses, 0);
        assert_eq!(audio.resumes, 0);
        assert_eq!(c.pool().role(0), Some(SlotRole::Ambient));
        assert!(c.pool().element(0).unwrap().muted);
    }

    #[test]
    fn degenerate_container_rests_at_zero() {
        struct Flat;
        impl LayoutProbe for Flat {
            fn geometry(&self) -> Option<FrameGeometry> {
                Some(FrameGeometry {
                    metrics: ScrollMetrics {
                        container_top: -300.0,
                        container_height: 800.0,
                        viewport_height: 800.0,
                    },
                    carousel_top: 200.0,
                    viewport: Viewport::new(1440.0, 800.0),
                })
            }
        }

        let mut c = controller();
        let mut audio = CountingAudio::default();
        let f = *c.on_frame(&Flat, &mut audio, None).unwrap();
        assert_eq!(f.sample.progress, 0.0);
        assert_eq!(f.sample.phase, Phase::ScaleUp);
        assert_eq!(f.active, 0);
    }

    #[test]
    fn unmounted_frame_changes_nothing() {
        let mut c = controller();
        let mut audio = CountingAudio::default();
        assert!(c.on_frame(&Unmounted, &mut audio, None).is_none());
        assert!(c.last_frame().is_none());
        assert_eq!(c.pool().role(0), None);
        assert_eq!(c.pool().element(0).unwrap().plays, 0);
    }

    #[test]
    fn scale_up_docks_before_sliding() {
        let mut c = controller();
        let mut audio = CountingAudio::default();
        let mut p = page();

        p.scroll_to(0.0);
        let f = *c.on_frame(&p, &mut audio, None).unwrap();
        assert_eq!(f.layout.position, Position::Relative);

        p.scroll_to(p.scroll_for_progress(0.24));
        let f = *c.on_frame(&p, &mut audio, None).unwrap();
        assert_eq!(f.sample.phase, Phase::ScaleUp);
        assert!(eq(f.sample.local, 1.0));
        assert_eq!(f.layout.position, Position::Fixed);
        assert!(eq(f.layout.width_pct, 100.0));
    }

    #[test]
    fn default_page_enters_sliding_without_a_jump() {
        let config = AppConfig::defaults(PathBuf::from("unused.toml"));
        for mobile in [false, true] {
            let upright = config.viewport.viewport(mobile);
            for viewport in [upright, upright.rotated()] {
                let mut c = controller();
                let mut audio = CountingAudio::default();
                let mut p = VirtualPage::new(config.page, viewport);
                let boundary = p.scroll_for_progress(config.tuning.scale_up_end);

                p.scroll_to(boundary - 0.5);
                let before = *c.on_frame(&p, &mut audio, None).unwrap();
                p.scroll_to(boundary);
                let after = *c.on_frame(&p, &mut audio, None).unwrap();

                assert_eq!(before.sample.phase, Phase::ScaleUp, "{viewport:?}");
                assert_eq!(after.sample.phase, Phase::Sliding, "{viewport:?}");
                assert!(eq(before.sample.local, 1.0), "{viewport:?}: {}", before.sample.local);
                assert_eq!(before.layout.position, after.layout.position);
                assert_eq!(before.layout.z_index, after.layout.z_index);

                let a = before.layout.placement(before.geometry.carousel_top, viewport);
                let b = after.layout.placement(after.geometry.carousel_top, viewport);
                for (x, y) in [(a.left, b.left), (a.top, b.top), (a.width, b.width), (a.height, b.height)] {
                    assert!(eq(x, y), "{viewport:?}: {a:?} vs {b:?}");
                }
            }
        }
    }

    #[test]
    fn slide_transforms_follow_last_frame() {
        let mut c = controller();
        let mut audio = CountingAudio::default();
        let mut p = page();
        assert_eq!(c.slide_transforms()[0].opacity, 1.0);

        p.scroll_to(p.scroll_for_progress(0.507));
        c.on_frame(&p, &mut audio, None);
        let t = c.slide_transforms();
        assert_eq!(t.len(), 7);
        assert_eq!(t[4].opacity, 1.0);
        assert!(eq(t[3].translate_x_pct, -50.0));
        assert!(eq(t[5].translate_x_pct, 50.0));
        assert!(eq(t[0].translate_x_pct, -100.0));
    }

    #[test]
    fn mobile_viewport_selects_mobile_layout() {
        let mut c = controller();
        let mut audio = CountingAudio::default();
        let p = VirtualPage::new(PageConfig::default(), Viewport::new(390.0, 844.0));
        let f = *c.on_frame(&p, &mut audio, None).unwrap();
        assert_eq!(f.device, DeviceClass::Mobile);
    }

    #[test]
    fn buffered_counts_played_and_preloaded_clips() {
        use crate::core::media::{AutoplayPolicy, UserActivation};

        let activation = UserActivation::default();
        let mut c = CarouselController::new(Tuning::DEFAULT, default_videos(), |v| {
            SimulatedMedia::new(v.id.clone(), 10.0, AutoplayPolicy::AllowAll, activation.clone())
        });
        let mut audio = CountingAudio::default();
        let mut p = page();
        assert_eq!(c.buffered(), 0);

        p.scroll_to(p.scroll_for_progress(0.3));
        c.on_frame(&p, &mut audio, None);
        // Active clip 0 plus its right-hand neighbour.
        assert_eq!(c.buffered(), 2);
    }

    #[test]
    fn dispose_releases_duck_and_parks() {
        let mut c = controller();
        let mut audio = CountingAudio::default();
        let mut p = page();

        p.scroll_to(p.scroll_for_progress(0.4));
        c.on_frame(&p, &mut audio, None);
        c.dispose(&mut audio);
        c.dispose(&mut audio);
        assert_eq!(audio.pauses, 1);
        assert_eq!(audio.resumes, 1);
        for i in 0..7 {
            let el = c.pool().element(i).unwrap();
            assert!(el.muted && el.paused);
        }
        assert!(c.on_frame(&p, &mut audio, None).is_none());
    }
}
