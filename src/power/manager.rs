//! # Power manager: the control state machine.
//!
//! The [`PowerManager`] owns every piece of power-control state: the mode
//! resolved from the weekly schedule, the input latches fed by the dispatcher,
//! the output latches mirroring the last emitted control command, and the two
//! hold timers. Once per tick (250 ms) it re-resolves the schedule and runs
//! the active mode's handler.
//!
//! ## Latches
//! Inputs: `button` is one-shot (cleared at the end of every tick);
//! `camera_motion` / `sensor_motion` are sticky levels. Outputs: an actuator
//! command is emitted onto the channel iff the in-memory latch flips, so
//! steady ticks never produce duplicate control events — the latch is the
//! single source of truth for "did we already ask for this state".
//!
//! ## Concurrency
//! `dispatch` (called on the dispatcher's execution) and `tick` (the manager's
//! own loop) run on different tasks; the latches are the only cross-task
//! shared state and sit behind one mutex with short, non-awaiting critical
//! sections.
//!
//! ## Mode switches
//! When the resolved mode differs from the stored one, the tick runs with an
//! `initialize` flag: the mode handler first resets its timers and outputs to
//! that mode's rest state, exactly once per switch, so every mode starts from
//! a deterministic baseline regardless of what ran before.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::error::TaskError;
use crate::events::{Event, EventTx, PressKind};
use crate::power::{resolve_mode, HoldTimer, Mode, PowerSchedule};
use crate::runtime::{Dispatch, Task};

/// Interval between control ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(250);

/// How long the camera stream stays on after a short button press.
pub const DEFAULT_STREAM_HOLD: Duration = Duration::from_secs(30);

/// How long the display stays on after sensor motion ended.
pub const DEFAULT_MOTION_HOLD: Duration = Duration::from_secs(600);

/// Mutable state, guarded by one mutex shared between `tick` and `dispatch`.
#[derive(Debug, Default)]
struct PowerState {
    /// Stored mode; `None` until the first tick resolved the schedule.
    mode: Option<Mode>,
    /// One-shot button latch, consumed by the next tick.
    button: Option<PressKind>,
    /// Sticky camera-motion level.
    camera_motion: bool,
    /// Sticky sensor-motion level.
    sensor_motion: bool,
    /// Mirror of the last emitted stream command.
    stream_on: bool,
    /// Mirror of the last emitted display command.
    display_on: bool,
    /// Mirror of the last emitted slideshow command.
    slideshow_on: bool,
    stream_timer: HoldTimer,
    display_timer: HoldTimer,
}

/// Resolves the active mode and turns raw inputs into actuator commands.
pub struct PowerManager {
    tx: EventTx,
    clock: Arc<dyn Clock>,
    schedules: Vec<PowerSchedule>,
    motion_hold: Duration,
    stream_hold: Duration,
    tick_interval: Duration,
    state: Mutex<PowerState>,
}

impl PowerManager {
    /// Creates the manager with the configured schedule list and motion-hold
    /// timeout. Stream hold and tick interval use their defaults.
    pub fn new(
        tx: EventTx,
        clock: Arc<dyn Clock>,
        schedules: Vec<PowerSchedule>,
        motion_hold: Duration,
    ) -> Self {
        if schedules.is_empty() {
            tracing::debug!("no power schedules loaded");
        } else {
            for schedule in &schedules {
                tracing::debug!(?schedule, "loaded power schedule");
            }
        }
        Self {
            tx,
            clock,
            schedules,
            motion_hold,
            stream_hold: DEFAULT_STREAM_HOLD,
            tick_interval: DEFAULT_TICK_INTERVAL,
            state: Mutex::new(PowerState::default()),
        }
    }

    /// One control tick: resolve the mode, run its handler, clear the
    /// one-shot button latch.
    async fn tick(&self) {
        let mut st = self.state.lock().await;

        let (day, time) = self.clock.now_local();
        let resolved = resolve_mode(&self.schedules, day, time);
        let initialize = st.mode != Some(resolved);
        if initialize {
            match st.mode {
                None => tracing::info!(mode = %resolved, "power mode initialized"),
                Some(prev) => {
                    tracing::info!(from = %prev, to = %resolved, "power mode changed");
                }
            }
            st.mode = Some(resolved);
            self.tx.send(Event::notify(format!("Power mode: {resolved}")));
        }

        match resolved {
            Mode::AlwaysOn => self.tick_always_on(&mut st, initialize),
            Mode::MotionSensor => self.tick_motion_sensor(&mut st, initialize),
            Mode::CameraMotion => self.tick_camera_motion(&mut st, initialize),
        }

        // One-shot: whatever the mode did or did not do with it.
        st.button = None;
    }

    /// ALWAYS_ON: display defaults on; a long press turns it off and any press
    /// or sticky camera motion turns it back on.
    fn tick_always_on(&self, st: &mut PowerState, initialize: bool) {
        if initialize {
            st.stream_timer.stop();
            st.display_timer.stop();
            self.set_display(st, true);
            self.set_stream(st, false);
        }

        if st.display_on {
            if st.button == Some(PressKind::Long) {
                self.set_display(st, false);
            }
        } else if st.button.is_some() || st.camera_motion {
            self.set_display(st, true);
        }

        self.drive_stream(st);
    }

    /// MOTION_SENSOR: display driven by the PIR sensor with a hold timeout,
    /// and kept on while the stream is showing.
    fn tick_motion_sensor(&self, st: &mut PowerState, initialize: bool) {
        if initialize {
            st.stream_timer.stop();
            st.display_timer.stop();
            self.set_display(st, false);
            self.set_stream(st, false);
        }

        if st.sensor_motion {
            self.set_display(st, true);
            // Re-armed every tick while the level holds, so the hold counts
            // from the end of motion.
            st.display_timer.start(&*self.clock, self.motion_hold);
        }

        self.drive_stream(st);

        if st.stream_on {
            self.set_display(st, true);
        } else if st.display_on && st.display_timer.is_expired(&*self.clock) {
            self.set_display(st, false);
        }
    }

    /// CAMERA_MOTION: display mirrors the stream latch exactly.
    fn tick_camera_motion(&self, st: &mut PowerState, initialize: bool) {
        if initialize {
            st.stream_timer.stop();
            st.display_timer.stop();
            self.set_display(st, false);
            self.set_stream(st, false);
        }

        self.drive_stream(st);
        let mirror = st.stream_on;
        self.set_display(st, mirror);
    }

    /// Common stream rule: on upon camera motion or a short press (the press
    /// arms the hold); off once motion has ended and the hold has expired.
    fn drive_stream(&self, st: &mut PowerState) {
        if st.camera_motion {
            self.set_stream(st, true);
        }
        if st.button == Some(PressKind::Short) {
            self.set_stream(st, true);
            st.stream_timer.start(&*self.clock, self.stream_hold);
        }
        if st.stream_on && !st.camera_motion && st.stream_timer.is_expired(&*self.clock) {
            self.set_stream(st, false);
        }
    }

    fn set_display(&self, st: &mut PowerState, on: bool) {
        if st.display_on != on {
            st.display_on = on;
            tracing::debug!(on, "display power command");
            self.tx.send(Event::DisplayPowerControl { enable: on });
        }
    }

    fn set_stream(&self, st: &mut PowerState, on: bool) {
        if st.stream_on != on {
            st.stream_on = on;
            tracing::debug!(on, "camera stream command");
            self.tx.send(Event::CameraStreamControl { enable: on });
        }
    }

    fn set_slideshow(&self, st: &mut PowerState, on: bool) {
        if st.slideshow_on != on {
            st.slideshow_on = on;
            tracing::debug!(on, "slideshow command");
            self.tx.send(Event::SlideshowControl { enable: on });
        }
    }
}

#[async_trait]
impl Task for PowerManager {
    fn name(&self) -> &str {
        "power-manager"
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
        tracing::info!("power manager started");

        // The slideshow runs from startup and is not modulated by mode.
        {
            let mut st = self.state.lock().await;
            self.set_slideshow(&mut st, true);
        }

        loop {
            self.tick().await;
            tokio::select! {
                _ = ctx.cancelled() => break,
                _ = time::sleep(self.tick_interval) => {}
            }
        }

        tracing::info!("power manager stopped");
        Ok(())
    }
}

#[async_trait]
impl Dispatch for PowerManager {
    /// Latches inputs for the next tick. `Terminate` is handled by the task
    /// handle, not here.
    async fn dispatch(&self, event: &Event) {
        match event {
            Event::ButtonPressed(kind) => {
                self.state.lock().await.button = Some(*kind);
            }
            Event::CameraMotionChanged { active } => {
                self.state.lock().await.camera_motion = *active;
            }
            Event::SensorMotionChanged { active } => {
                self.state.lock().await.sensor_motion = *active;
            }
            _ => {}
        }
    }

    fn name(&self) -> &str {
        "power-manager"
    }
}
