//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use tokio::sync::watch;

use crate::config::AppConfig;
use crate::core::{
    ambient::{AmbientAudio, AudioSnapshot, SubscriptionId},
    controller::CarouselController,
    frame::{FrameScheduler, FrameTick},
    media::{SimulatedMedia, UserActivation},
    page::VirtualPage,
};
use crate::ui::smooth_scroll::SmoothScroll;

/// Length of the simulated background track.
const AMBIENT_TRACK_SECONDS: f64 = 180.0;

/// Top-level application state.
pub struct AppState {
    pub config: AppConfig,
    /// The page hosting the section; answers layout queries.
    pub page: VirtualPage,
    /// The page's single scroll/resize listener.
    pub scheduler: FrameScheduler,
    pub controller: CarouselController<SimulatedMedia>,
    /// Background track service owned by this page.
    pub audio: AmbientAudio<SimulatedMedia>,
    /// Latest audio state, published by the service's subscription.
    pub audio_status: watch::Receiver<AudioSnapshot>,
    audio_subscription: SubscriptionId,
    /// Sticky user activation shared by every media element.
    pub activation: UserActivation,
    pub scroll: SmoothScroll,
    /// Laid out with the mobile viewport.
    pub mobile: bool,
    /// Tab visibility.  Hidden tabs get no animation frames.
    pub visible: bool,
    /// Most recent frame the scheduler handed out.
    pub last_tick: Option<FrameTick>,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig, mobile: bool) -> Self {
        let activation = UserActivation::default();
        let policy = config.preview.autoplay;
        let clip_seconds = config.preview.clip_seconds;

        let controller = CarouselController::new(config.tuning, config.videos.clone(), |video| {
            SimulatedMedia::new(video.id.clone(), clip_seconds, policy, activation.clone())
        });

        let track = SimulatedMedia::new("ambient", AMBIENT_TRACK_SECONDS, policy, activation.clone());
        let mut audio = AmbientAudio::new(track, config.tuning.ambient_volume);
        let (tx, audio_status) = watch::channel(audio.snapshot());
        let audio_subscription = audio.subscribe(move |snapshot| {
            // No receiver left only happens during teardown.
            let _ = tx.send(*snapshot);
        });

        let page = VirtualPage::new(config.page, config.viewport.viewport(mobile));

        Self {
            page,
            scheduler: FrameScheduler::attach(),
            controller,
            audio,
            audio_status,
            audio_subscription,
            activation,
            scroll: SmoothScroll::new(0.35),
            mobile,
            visible: true,
            last_tick: None,
            should_quit: false,
            status_message: None,
            config,
        }
    }

    /// Tear the page down: hand back the duck and silence every clip, then
    /// stop listening for scroll and release the background track.
    pub fn dispose(&mut self) {
        self.controller.dispose(&mut self.audio);
        self.scheduler.dispose();
        self.audio.unsubscribe(self.audio_subscription);
        self.audio.dispose();
    }
}
