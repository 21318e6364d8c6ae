//! # Hardware input producers.
//!
//! Interrupt-style producers: the GPIO layer calls the edge/level entry points
//! from its own callback thread, and these only classify the input, format an
//! [`Event`] and enqueue it. No control logic runs in the callback context,
//! and nothing here ever blocks.

use std::sync::Mutex;
use std::time::Duration;

use crate::clock::Clock;
use crate::events::{Event, EventTx, PressKind};

/// Minimum hold for a press to count as long.
pub const LONG_PRESS_THRESHOLD: Duration = Duration::from_millis(1500);

/// Classifies push-button edges into short and long presses.
///
/// A rising edge records the press time; the falling edge measures the hold
/// and enqueues the classified [`Event::ButtonPressed`].
pub struct Button {
    tx: EventTx,
    clock: std::sync::Arc<dyn Clock>,
    threshold: Duration,
    pressed_at: Mutex<Option<Duration>>,
}

impl Button {
    /// Creates the classifier with the default long-press threshold.
    pub fn new(tx: EventTx, clock: std::sync::Arc<dyn Clock>) -> Self {
        Self {
            tx,
            clock,
            threshold: LONG_PRESS_THRESHOLD,
            pressed_at: Mutex::new(None),
        }
    }

    /// Rising edge: the button went down.
    pub fn pressed(&self) {
        let Ok(mut slot) = self.pressed_at.lock() else {
            return;
        };
        tracing::debug!("push button pressed");
        *slot = Some(self.clock.monotonic());
    }

    /// Falling edge: the button came up; classify and enqueue.
    pub fn released(&self) {
        let pressed_at = {
            let Ok(mut slot) = self.pressed_at.lock() else {
                return;
            };
            slot.take()
        };
        // A release without a recorded press (e.g. bounce at startup) is noise.
        let Some(pressed_at) = pressed_at else {
            return;
        };

        let held = self.clock.monotonic().saturating_sub(pressed_at);
        let kind = if held >= self.threshold {
            PressKind::Long
        } else {
            PressKind::Short
        };
        tracing::info!(?kind, held_ms = held.as_millis() as u64, "button press detected");
        self.tx.send(Event::ButtonPressed(kind));
    }
}

/// Forwards PIR motion-sensor level changes onto the channel.
pub struct MotionSensor {
    tx: EventTx,
}

impl MotionSensor {
    /// Creates the producer.
    pub fn new(tx: EventTx) -> Self {
        Self { tx }
    }

    /// Level change on the sensor line.
    pub fn level_changed(&self, active: bool) {
        if active {
            tracing::info!("motion detected");
        } else {
            tracing::info!("motion ended");
        }
        self.tx.send(Event::SensorMotionChanged { active });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveTime, Weekday};

    use super::*;
    use crate::clock::testing::ManualClock;
    use crate::events::channel;

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Weekday::Mon,
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        ))
    }

    #[tokio::test]
    async fn short_hold_classifies_as_short_press() {
        let (tx, mut rx) = channel();
        let clock = clock();
        let button = Button::new(tx, clock.clone());

        button.pressed();
        clock.advance(Duration::from_millis(200));
        button.released();

        assert_eq!(rx.try_recv(), Some(Event::ButtonPressed(PressKind::Short)));
    }

    #[tokio::test]
    async fn threshold_hold_classifies_as_long_press() {
        let (tx, mut rx) = channel();
        let clock = clock();
        let button = Button::new(tx, clock.clone());

        button.pressed();
        clock.advance(LONG_PRESS_THRESHOLD);
        button.released();

        assert_eq!(rx.try_recv(), Some(Event::ButtonPressed(PressKind::Long)));
    }

    #[tokio::test]
    async fn release_without_press_is_ignored() {
        let (tx, mut rx) = channel();
        let button = Button::new(tx, clock());
        button.released();
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn motion_sensor_forwards_levels() {
        let (tx, mut rx) = channel();
        let sensor = MotionSensor::new(tx);
        sensor.level_changed(true);
        sensor.level_changed(false);
        assert_eq!(
            rx.try_recv(),
            Some(Event::SensorMotionChanged { active: true })
        );
        assert_eq!(
            rx.try_recv(),
            Some(Event::SensorMotionChanged { active: false })
        );
    }
}
