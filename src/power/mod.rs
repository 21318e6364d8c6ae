//! Power-mode resolution and the control state machine.

mod manager;
mod mode;
mod schedule;
mod timer;

pub use manager::{PowerManager, DEFAULT_MOTION_HOLD, DEFAULT_STREAM_HOLD, DEFAULT_TICK_INTERVAL};
pub use mode::Mode;
pub use schedule::{resolve_mode, DayRule, PowerSchedule};
pub use timer::HoldTimer;
