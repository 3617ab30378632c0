//! Page scroll easing with exponential ease-out.
//!
//! Wheel notches and key presses move a target offset.  Each frame the
//! displayed offset closes a fixed fraction of the remaining distance, so a
//! burst of input turns into a short decelerating glide, much like a
//! browser's smooth scrolling.

/// Pixel-offset smooth scroll animator.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    /// Offset currently applied to the page.
    position: f64,
    /// Offset the page is heading for.
    target: f64,
    /// Damping: `distance *= (1 - speed)` each tick.
    speed: f64,
}

impl SmoothScroll {
    /// Residual distance (px) at which the glide snaps onto the target.
    const SETTLE_PX: f64 = 0.5;

    pub fn new(speed: f64) -> Self {
        Self {
            position: 0.0,
            target: 0.0,
            speed: speed.clamp(0.05, 0.95),
        }
    }

    #[cfg(test)]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[cfg(test)]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Move the target by `delta`, clamped to `[0, max]`.
    pub fn push(&mut self, delta: f64, max: f64) {
        self.set_target(self.target + delta, max);
    }

    pub fn set_target(&mut self, target: f64, max: f64) {
        self.target = target.clamp(0.0, max.max(0.0));
    }

    /// Jump straight to the target.  Returns the new position.
    pub fn snap(&mut self) -> f64 {
        self.position = self.target;
        self.position
    }

    /// Forget any glide and stand at `offset` (the page moved on its own).
    pub fn reset_to(&mut self, offset: f64) {
        self.position = offset;
        self.target = offset;
    }

    /// Advance one frame.  Returns the new position when it moved.
    pub fn tick(&mut self) -> Option<f64> {
        if !self.is_animating() {
            return None;
        }
        let remaining = self.target - self.position;
        if remaining.abs() * (1.0 - self.speed) < Self::SETTLE_PX {
            self.position = self.target;
        } else {
            self.position += remaining * self.speed;
        }
        Some(self.position)
    }

    pub fn is_animating(&self) -> bool {
        self.position != self.target
    }
}
