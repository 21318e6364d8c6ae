//! Actuator wrappers around external programs and hardware commands.

mod display;
mod notifier;
mod process;
mod slideshow;
mod stream;

pub use display::DisplayPower;
pub use notifier::Notifier;
pub use slideshow::Slideshow;
pub use stream::CameraStream;
