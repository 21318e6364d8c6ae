//! # Arm/expire countdown.
//!
//! [`HoldTimer`] bounds how long an output stays latched on. It reads time
//! through the injected [`Clock`] so tick logic can be tested without real
//! time passing.
//!
//! Contract:
//! - expired before `start` was ever called
//! - not expired immediately after `start(d)` for `d > 0`
//! - expired once `d` has elapsed
//! - `stop` forces expired

use std::time::Duration;

use crate::clock::Clock;

/// Countdown armed for a fixed hold period against a monotonic clock.
#[derive(Debug, Default)]
pub struct HoldTimer {
    deadline: Option<Duration>,
}

impl HoldTimer {
    /// Creates an unarmed (expired) timer.
    pub fn new() -> Self {
        Self { deadline: None }
    }

    /// Arms the timer for `hold` from now. Re-arming replaces the deadline.
    pub fn start(&mut self, clock: &dyn Clock, hold: Duration) {
        self.deadline = Some(clock.monotonic() + hold);
    }

    /// Disarms the timer; it reads as expired afterwards.
    pub fn stop(&mut self) {
        self.deadline = None;
    }

    /// True if the timer never started, was stopped, or its hold has elapsed.
    pub fn is_expired(&self, clock: &dyn Clock) -> bool {
        match self.deadline {
            None => true,
            Some(deadline) => clock.monotonic() >= deadline,
        }
    }
}
