//! Media element abstraction.
//!
//! The controller never talks to a concrete player.  It drives anything that
//! implements [`MediaElement`]; the terminal preview plugs in
//! [`SimulatedMedia`], which models the browser behaviour the controller has
//! to cope with (autoplay restrictions, detached elements, looping).

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

/// Why a `play()` request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("playback with sound needs a user gesture first")]
    AutoplayBlocked,
    #[error("element is no longer attached to the page")]
    Detached,
    #[error("decode failed: {0}")]
    Decode(String),
}

/// The subset of an HTML media element the carousel uses.
pub trait MediaElement: fmt::Debug {
    /// Start or continue playback.  May be refused; callers treat refusal as
    /// "stays on its current frame".
    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self);
    /// Begin fetching enough data to show the first frame.
    fn load(&mut self);
    fn set_muted(&mut self, muted: bool);
    fn is_muted(&self) -> bool;
    fn is_paused(&self) -> bool;
    fn set_current_time(&mut self, seconds: f64);
    fn current_time(&self) -> f64;
    fn set_volume(&mut self, volume: f64);
    /// Advance playback by `dt` seconds.  Real elements advance on their own.
    fn advance(&mut self, _dt: f64) {}
}

// ───────────────────────────────────────── autoplay ──────────

/// Sticky user activation shared by every element of one page.
#[derive(Debug, Clone, Default)]
pub struct UserActivation(Arc<AtomicBool>);

impl UserActivation {
    pub fn activate(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Which `play()` calls a simulated element accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutoplayPolicy {
    /// Everything plays.
    AllowAll,
    /// Muted playback always works; audible playback waits for a gesture.
    #[default]
    MutedOnly,
}

// ───────────────────────────────────────── simulation ────────

/// In-process stand-in for a browser media element.  Always loops.
#[derive(Debug)]
pub struct SimulatedMedia {
    label: String,
    duration: f64,
    muted: bool,
    paused: bool,
    current_time: f64,
    volume: f64,
    loaded: bool,
    detached: bool,
    policy: AutoplayPolicy,
    activation: UserActivation,
}

impl SimulatedMedia {
    /// A muted, paused element, as the page markup creates it.
    pub fn new(
        label: impl Into<String>,
        duration: f64,
        policy: AutoplayPolicy,
        activation: UserActivation,
    ) -> Self {
        Self {
            label: label.into(),
            duration: duration.max(0.0),
            muted: true,
            paused: true,
            current_time: 0.0,
            volume: 1.0,
            loaded: false,
            detached: false,
            policy,
            activation,
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[cfg(test)]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Simulate the element being removed from the page.
    #[cfg(test)]
    pub fn detach(&mut self) {
        self.detached = true;
        self.paused = true;
    }
}

impl MediaElement for SimulatedMedia {
    fn play(&mut self) -> Result<(), MediaError> {
        if self.detached {
            return Err(MediaError::Detached);
        }
        if !self.muted
            && self.policy == AutoplayPolicy::MutedOnly
            && !self.activation.is_active()
        {
            trace!(element = self.label.as_str(), "audible play before a user gesture");
            return Err(MediaError::AutoplayBlocked);
        }
        if self.duration <= 0.0 {
            return Err(MediaError::Decode(format!("{} has no media data", self.label)));
        }
        self.loaded = true;
        self.paused = false;
        trace!(element = self.label.as_str(), muted = self.muted, volume = self.volume, "playing");
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn load(&mut self) {
        if !self.detached {
            self.loaded = true;
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.current_time = seconds.clamp(0.0, self.duration);
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn advance(&mut self, dt: f64) {
        if self.paused || self.duration <= 0.0 || dt <= 0.0 {
            return;
        }
        self.current_time = (self.current_time + dt) % self.duration;
    }
}
