//! Scroll-phase carousel core: phase math, layout, playback and audio.
//!
//! Nothing in this module depends on the terminal or any rendering crate.
//! Media and layout are reached through traits ([`media::MediaElement`],
//! [`frame::LayoutProbe`]) so the same controller drives the preview and the
//! tests.

pub mod ambient;
pub mod controller;
pub mod ducking;
pub mod frame;
pub mod index;
pub mod layout;
pub mod media;
pub mod page;
pub mod phase;
pub mod pool;
pub mod tuning;
pub mod video;
