//! Typed event model and the shared communication channel.

mod channel;
mod event;

pub use channel::{channel, EventRx, EventTx};
pub use event::{Event, PressKind, Signal};
