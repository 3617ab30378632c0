//! The page's background track as an owned service.
//!
//! One [`AmbientAudio`] exists per page.  It is created with its media
//! element, observed through [`AmbientAudio::subscribe`], and shut down with
//! [`AmbientAudio::dispose`].  Nothing about it lives in globals, so a page
//! transition simply drops the old service and builds a new one.
//!
//! Playback needs both an unmuted preference and a prior user gesture.  While
//! the carousel holds a duck on the track, only [`BackgroundAudio::release_duck`]
//! may restart it; every other resume path is ignored until then.

use tracing::debug;

use super::media::MediaElement;

/// The two calls the carousel makes on the shared background track.
pub trait BackgroundAudio {
    /// Pause the track on the carousel's behalf and hold it paused.
    fn duck(&mut self);
    /// Drop the hold and resume if the user wants sound.
    fn release_duck(&mut self);
}

/// Observable state of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AudioSnapshot {
    pub playing: bool,
    pub muted: bool,
    pub user_interacted: bool,
    pub ducked: bool,
}

impl AudioSnapshot {
    pub fn label(&self) -> &'static str {
        if self.ducked {
            "ducked"
        } else if self.muted {
            "muted"
        } else if !self.user_interacted {
            "waiting for gesture"
        } else if self.playing {
            "playing"
        } else {
            "paused"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&AudioSnapshot)>;

pub struct AmbientAudio<E> {
    element: E,
    muted: bool,
    user_interacted: bool,
    ducked: bool,
    disposed: bool,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
    last_notified: Option<AudioSnapshot>,
}

impl<E: MediaElement> std::fmt::Debug for AmbientAudio<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmbientAudio")
            .field("element", &self.element)
            .field("snapshot", &self.snapshot())
            .field("listeners", &self.listeners.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl<E: MediaElement> AmbientAudio<E> {
    /// Wrap `element`.  Starts muted and waiting for a user gesture.
    pub fn new(mut element: E, volume: f64) -> Self {
        element.set_volume(volume);
        element.set_muted(false);
        element.pause();
        Self {
            element,
            muted: true,
            user_interacted: false,
            ducked: false,
            disposed: false,
            listeners: Vec::new(),
            next_id: 0,
            last_notified: None,
        }
    }

    pub fn snapshot(&self) -> AudioSnapshot {
        AudioSnapshot {
            playing: !self.element.is_paused(),
            muted: self.muted,
            user_interacted: self.user_interacted,
            ducked: self.ducked,
        }
    }

    #[cfg(test)]
    pub fn element(&self) -> &E {
        &self.element
    }

    #[cfg(test)]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Register a listener called after every state change.
    pub fn subscribe(&mut self, listener: impl FnMut(&AudioSnapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        if !self.disposed {
            self.listeners.push((id, Box::new(listener)));
        }
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// The first click, key press or touch anywhere on the page.
    pub fn note_user_interaction(&mut self) {
        if self.disposed || self.user_interacted {
            return;
        }
        debug!("user interaction unlocks background audio");
        self.user_interacted = true;
        self.start();
        self.notify();
    }

    /// Flip the user's sound preference.  Unmuting counts as a gesture.
    pub fn toggle_mute(&mut self) {
        if self.disposed {
            return;
        }
        if self.muted {
            self.muted = false;
            self.user_interacted = true;
            self.start();
        } else {
            self.muted = true;
            self.element.pause();
        }
        self.notify();
    }

    /// Pause without changing the user's preference.
    pub fn pause_temporarily(&mut self) {
        if self.disposed || self.element.is_paused() {
            return;
        }
        self.element.pause();
        self.notify();
    }

    /// Resume when the user wants sound and has interacted.  Ignored while
    /// the track is ducked.
    pub fn resume(&mut self) {
        if self.disposed {
            return;
        }
        if self.ducked {
            debug!("resume ignored while ducked");
            return;
        }
        self.start();
        self.notify();
    }

    /// Tab visibility changed.
    pub fn on_visibility_change(&mut self, visible: bool) {
        if visible && self.user_interacted && !self.muted && self.element.is_paused() {
            self.resume();
        }
    }

    /// Advance the element's clock (simulated elements only).
    pub fn advance(&mut self, dt: f64) {
        self.element.advance(dt);
    }

    /// Stop playback and drop every listener.  Later calls are no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.element.pause();
        self.listeners.clear();
        self.disposed = true;
    }

    fn start(&mut self) {
        if self.muted || !self.user_interacted || self.ducked {
            return;
        }
        if let Err(err) = self.element.play() {
            debug!(%err, "background audio play refused");
        }
    }

    fn notify(&mut self) {
        let snapshot = self.snapshot();
        if self.last_notified == Some(snapshot) {
            return;
        }
        self.last_notified = Some(snapshot);
        for (_, listener) in &mut self.listeners {
            listener(&snapshot);
        }
    }
}

impl<E: MediaElement> BackgroundAudio for AmbientAudio<E> {
    fn duck(&mut self) {
        if self.disposed || self.ducked {
            return;
        }
        self.ducked = true;
        self.element.pause();
        self.notify();
    }

    fn release_duck(&mut self) {
        if self.disposed || !self.ducked {
            return;
        }
        self.ducked = false;
        self.start();
        self.notify();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::core::pool::tests::CountingMedia;

    fn service() -> AmbientAudio<CountingMedia> {
        AmbientAudio::new(CountingMedia::fresh(), 0.3)
    }

    #[test]
    fn starts_silent_until_unmuted() {
        let mut audio = service();
        audio.note_user_interaction();
        assert!(!audio.snapshot().playing);
        assert_eq!(audio.element().volume, 0.3);

        audio.toggle_mute();
        let s = audio.snapshot();
        assert!(s.playing && !s.muted && s.user_interacted);

        audio.toggle_mute();
        assert!(!audio.snapshot().playing);
    }

    #[test]
    fn resume_needs_gesture_and_preference() {
        let mut audio = service();
        audio.resume();
        assert!(!audio.snapshot().playing);
        assert_eq!(audio.element().plays, 0);
    }

    #[test]
    fn duck_holds_off_other_resumes() {
        let mut audio = service();
        audio.toggle_mute();
        audio.duck();
        assert!(!audio.snapshot().playing);

        audio.resume();
        audio.on_visibility_change(true);
        audio.toggle_mute();
        audio.toggle_mute();
        assert!(!audio.snapshot().playing);

        audio.release_duck();
        assert!(audio.snapshot().playing);
    }

    #[test]
    fn release_respects_mute() {
        let mut audio = service();
        audio.toggle_mute();
        audio.duck();
        audio.toggle_mute();
        audio.release_duck();
        assert!(!audio.snapshot().playing);
    }

    #[test]
    fn visibility_restarts_interrupted_track() {
        let mut audio = service();
        audio.toggle_mute();
        audio.pause_temporarily();
        assert!(!audio.snapshot().playing);
        audio.on_visibility_change(false);
        assert!(!audio.snapshot().playing);
        audio.on_visibility_change(true);
        assert!(audio.snapshot().playing);
    }

    #[test]
    fn listeners_see_changes_until_unsubscribed() {
        let mut audio = service();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = audio.subscribe(move |s| sink.borrow_mut().push(*s));

        audio.toggle_mute();
        audio.toggle_mute();
        assert_eq!(seen.borrow().len(), 2);
        assert!(seen.borrow()[0].playing);
        assert!(!seen.borrow()[1].playing);

        assert!(audio.unsubscribe(id));
        assert!(!audio.unsubscribe(id));
        audio.toggle_mute();
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn dispose_silences_and_ignores_later_calls() {
        let mut audio = service();
        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);
        audio.subscribe(move |_| *sink.borrow_mut() += 1);
        audio.toggle_mute();
        assert_eq!(*calls.borrow(), 1);

        audio.dispose();
        assert!(audio.is_disposed());
        assert!(!audio.snapshot().playing);

        audio.toggle_mute();
        audio.release_duck();
        audio.resume();
        assert!(!audio.snapshot().playing);
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn refused_playback_is_swallowed() {
        let mut element = CountingMedia::fresh();
        element.refuse = true;
        let mut audio = AmbientAudio::new(element, 0.3);
        audio.toggle_mute();
        assert!(!audio.snapshot().playing);
        assert_eq!(audio.element().plays, 1);
    }
}
