//! # Core consumer capability.
//!
//! [`Dispatch`] is the single seam every event consumer implements — passive
//! actuator wrappers and full tasks alike. The dispatcher stores and invokes
//! consumers only through this trait, in a fixed registration order.
//!
//! ## Contract
//! - `dispatch` is awaited to completion before the next consumer sees the
//!   event and before the next event is dequeued. Keep it short; anything
//!   long-running belongs in a [`Task`](crate::runtime::Task).
//! - Events arrive by shared reference and must not be mutated.

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event consumers.
#[async_trait]
pub trait Dispatch: Send + Sync + 'static {
    /// Handles a single event.
    ///
    /// Consumers ignore signals they do not care about.
    async fn dispatch(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
