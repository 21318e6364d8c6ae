//! Task lifecycle, event fan-out and supervision.

mod dispatch;
mod dispatcher;
mod supervisor;
mod task;

pub use dispatch::Dispatch;
pub use dispatcher::Dispatcher;
pub use supervisor::Supervisor;
pub use task::{Task, TaskHandle};
