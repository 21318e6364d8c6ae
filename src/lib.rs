//! # framevisor
//!
//! Event-driven controller for an unattended surveillance picture frame: a
//! picture slideshow, a display's power state, a live camera stream and an
//! on-screen notifier, driven by a push button, a PIR motion sensor, a
//! network-delivered camera-motion signal and a weekly time schedule.
//!
//! ## Architecture
//! ```text
//! Producers (many):                            Consumers (fixed order):
//!   Button ─────────┐
//!   MotionSensor ───┤                           ┌──► Slideshow
//!   MotionServer ───┼──► EventTx ──► EventRx ───┼──► DisplayPower
//!   PowerManager ───┘   (one unbounded FIFO)    ├──► CameraStream
//!                                   │           ├──► Notifier
//!                              Dispatcher ──────┴──► PowerManager
//!                           (single reader,
//!                            in-order fan-out)
//!
//!   Supervisor ── polls liveness of {Dispatcher, MotionServer,
//!                 Notifier, PowerManager}; on first death (or external
//!                 Terminate) cascades Terminate to every handle.
//! ```
//!
//! The power manager is the only stateful component: once per tick it
//! re-resolves the active mode from the weekly schedule and turns the latched
//! inputs into `*Control` events; the actuator wrappers are thin, stateless
//! shells around external programs.
//!
//! Cancellation is cooperative throughout: `Terminate` on the channel stops
//! the dispatcher, a [`TaskHandle`](runtime::TaskHandle) maps `Terminate` to
//! stop-and-join, and every run loop selects on its `CancellationToken`.

pub mod actuators;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod gpio;
pub mod http;
pub mod inputs;
pub mod power;
pub mod runtime;
pub mod shutdown;

pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use error::{ConfigError, RuntimeError, TaskError};
pub use events::{Event, EventRx, EventTx, PressKind, Signal};
pub use power::{Mode, PowerManager, PowerSchedule};
pub use runtime::{Dispatch, Dispatcher, Supervisor, Task, TaskHandle};
