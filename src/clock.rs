//! # Injectable time source.
//!
//! The power state machine needs two notions of time: the local wall clock
//! (weekday + time of day, for schedule resolution) and a monotonic reading
//! (for hold timers). [`Clock`] bundles both behind one seam so tick logic and
//! timers can be unit-tested without real time passing.
//!
//! [`SystemClock`] is the production implementation; tests use the manual
//! clock in [`testing`].

use std::time::{Duration, Instant};

use chrono::{Local, NaiveTime, Timelike, Weekday};

/// Time source for schedule resolution and hold timers.
pub trait Clock: Send + Sync + 'static {
    /// Current local weekday and time of day.
    fn now_local(&self) -> (Weekday, NaiveTime);

    /// Monotonic time since an arbitrary fixed epoch.
    fn monotonic(&self) -> Duration;
}

/// Wall clock + `Instant`-based monotonic time.
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Creates a clock whose monotonic epoch is "now".
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_local(&self) -> (Weekday, NaiveTime) {
        let now = Local::now();
        // Strip sub-second noise; schedules are minute-granular.
        let time = now.time().with_nanosecond(0).unwrap_or_else(|| now.time());
        (chrono::Datelike::weekday(&now), time)
    }

    fn monotonic(&self) -> Duration {
        self.epoch.elapsed()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Manually advanced clock for tick-logic tests.
    pub(crate) struct ManualClock {
        state: Mutex<(Weekday, NaiveTime, Duration)>,
    }

    impl ManualClock {
        pub(crate) fn new(day: Weekday, time: NaiveTime) -> Self {
            Self {
                state: Mutex::new((day, time, Duration::ZERO)),
            }
        }

        /// Sets the wall-clock reading.
        pub(crate) fn set_local(&self, day: Weekday, time: NaiveTime) {
            let mut st = self.state.lock().unwrap();
            st.0 = day;
            st.1 = time;
        }

        /// Advances the monotonic reading.
        pub(crate) fn advance(&self, by: Duration) {
            self.state.lock().unwrap().2 += by;
        }
    }

    impl Clock for ManualClock {
        fn now_local(&self) -> (Weekday, NaiveTime) {
            let st = self.state.lock().unwrap();
            (st.0, st.1)
        }

        fn monotonic(&self) -> Duration {
            self.state.lock().unwrap().2
        }
    }
}
