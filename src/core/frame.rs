//! Frame scheduling for scroll-driven work.
//!
//! A page registers one [`FrameScheduler`] for all of its scroll and resize
//! notifications.  Notifications never do work themselves; they only leave a
//! request behind, replacing any request still waiting, and the next
//! animation frame turns the surviving request into a single [`FrameTick`].
//! Geometry is read through a [`LayoutProbe`] when the frame runs, never when
//! the notification arrives.

use tracing::trace;

use super::phase::FrameGeometry;

/// Reads the current layout.  `None` means the relevant elements are not
/// mounted (yet, or any more).
pub trait LayoutProbe {
    fn geometry(&self) -> Option<FrameGeometry>;
}

/// What caused a frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameReason {
    /// Initial request made when the scheduler attaches.
    Mount,
    Scroll,
    Resize,
}

/// One frame's worth of work, handed out by [`FrameScheduler::poll_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Monotonic frame counter.
    pub index: u64,
    /// Reason of the most recent notification folded into this frame.
    pub reason: FrameReason,
    /// Number of notifications this frame answers.
    pub coalesced: u32,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    reason: FrameReason,
    coalesced: u32,
}

#[derive(Debug)]
pub struct FrameScheduler {
    pending: Option<Pending>,
    frames_run: u64,
    superseded: u64,
    attached: bool,
}

impl FrameScheduler {
    /// Start listening.  A first frame is requested immediately so the page
    /// is laid out before the user scrolls.
    pub fn attach() -> Self {
        Self {
            pending: Some(Pending {
                reason: FrameReason::Mount,
                coalesced: 1,
            }),
            frames_run: 0,
            superseded: 0,
            attached: true,
        }
    }

    #[cfg(test)]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[cfg(test)]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[cfg(test)]
    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    /// Requests replaced before their frame ran.
    pub fn superseded(&self) -> u64 {
        self.superseded
    }

    /// Record a scroll or resize.  Returns `true` when it replaced a request
    /// that had not run yet.  Ignored once disposed.
    pub fn notify(&mut self, reason: FrameReason) -> bool {
        if !self.attached {
            return false;
        }
        match self.pending.as_mut() {
            Some(pending) => {
                pending.reason = reason;
                pending.coalesced += 1;
                self.superseded += 1;
                trace!(?reason, coalesced = pending.coalesced, "frame request replaced");
                true
            }
            None => {
                self.pending = Some(Pending {
                    reason,
                    coalesced: 1,
                });
                false
            }
        }
    }

    /// Called once per animation frame.  Yields the pending request, if any.
    pub fn poll_frame(&mut self) -> Option<FrameTick> {
        let pending = self.pending.take()?;
        let tick = FrameTick {
            index: self.frames_run,
            reason: pending.reason,
            coalesced: pending.coalesced,
        };
        self.frames_run += 1;
        Some(tick)
    }

    /// Drop a waiting request.  Returns whether there was one.
    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Stop listening and cancel anything pending.
    pub fn dispose(&mut self) {
        self.cancel_pending();
        self.attached = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attaching_requests_a_first_frame() {
        let mut s = FrameScheduler::attach();
        let tick = s.poll_frame().unwrap();
        assert_eq!(tick.reason, FrameReason::Mount);
        assert_eq!(tick.index, 0);
        assert!(s.poll_frame().is_none());
    }

    #[test]
    fn bursts_collapse_into_one_frame() {
        let mut s = FrameScheduler::attach();
        s.poll_frame();

        assert!(!s.notify(FrameReason::Scroll));
        assert!(s.notify(FrameReason::Scroll));
        assert!(s.notify(FrameReason::Resize));
        let tick = s.poll_frame().unwrap();
        assert_eq!(tick.coalesced, 3);
        assert_eq!(tick.reason, FrameReason::Resize);
        assert_eq!(tick.index, 1);
        assert_eq!(s.superseded(), 2);
        assert!(s.poll_frame().is_none());
        assert_eq!(s.frames_run(), 2);
    }

    #[test]
    fn cancelled_request_never_runs() {
        let mut s = FrameScheduler::attach();
        s.poll_frame();
        s.notify(FrameReason::Scroll);
        assert!(s.cancel_pending());
        assert!(!s.cancel_pending());
        assert!(s.poll_frame().is_none());
    }

    #[test]
    fn disposed_scheduler_ignores_notifications() {
        let mut s = FrameScheduler::attach();
        s.dispose();
        assert!(!s.is_attached());
        assert!(!s.has_pending());
        s.notify(FrameReason::Scroll);
        assert!(s.poll_frame().is_none());
    }
}
