//! [`Cooldown`] – rate limiter for autonomous actions.
//!
//! Records when an action category last fired and answers whether its window
//! has elapsed. Callers pass the current instant in, so observation
//! timestamps drive the clock and tests need no sleeping.

use std::time::{Duration, Instant};

/// Minimum spacing between two actions of one category.
#[derive(Debug, Clone)]
pub struct Cooldown {
    window: Duration,
    last_fired: Option<Instant>,
}

impl Cooldown {
    /// A cooldown that has never fired and is therefore ready.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// `true` when more than the window has passed since the last firing.
    ///
    /// An instant earlier than the last firing counts as no time elapsed.
    pub fn is_ready(&self, now: Instant) -> bool {
        match self.last_fired {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.window,
        }
    }

    /// Mark the category as having fired at `now`.
    pub fn stamp(&mut self, now: Instant) {
        self.last_fired = Some(now);
    }

    /// Stamp and return `true` if ready, otherwise leave untouched.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        if self.is_ready(now) {
            self.stamp(now);
            true
        } else {
            false
        }
    }

    /// Forget the last firing.
    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}
