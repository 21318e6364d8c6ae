//! # Events exchanged between components.
//!
//! An [`Event`] is an immutable envelope: a [`Signal`] identity plus the typed
//! payload that belongs to it. Producers create events, the dispatcher fans
//! them out, and every consumer reads them without mutation.
//!
//! Consumers switch on [`Event::signal`] (or match the variant directly);
//! adding a new event kind requires no change to components that do not care
//! about it.

use std::sync::Arc;

/// Identifies what an [`Event`] means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Cooperative shutdown request; the universal cancellation primitive.
    Terminate,
    /// The push button was pressed and released.
    ButtonPressed,
    /// The camera's own motion detection changed level.
    CameraMotionChanged,
    /// The PIR motion sensor changed level.
    SensorMotionChanged,
    /// Command: show or hide the camera stream.
    CameraStreamControl,
    /// Command: power the display on or off.
    DisplayPowerControl,
    /// Command: start or stop the picture slideshow.
    SlideshowControl,
    /// Show an on-screen notification.
    Notify,
}

/// How long the push button was held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressKind {
    /// Released before the long-press threshold.
    Short,
    /// Held at least the long-press threshold (1.5 s).
    Long,
}

/// An immutable message carried by the channel.
///
/// Payload shapes are fixed per signal; `Notify` text is `Arc<str>` so clones
/// stay cheap on the fan-out path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Request cooperative shutdown.
    Terminate,
    /// A classified button press.
    ButtonPressed(PressKind),
    /// Camera motion level: `true` while the camera reports motion.
    CameraMotionChanged {
        /// Current level.
        active: bool,
    },
    /// PIR sensor motion level.
    SensorMotionChanged {
        /// Current level.
        active: bool,
    },
    /// Turn the camera stream on or off.
    CameraStreamControl {
        /// Desired state.
        enable: bool,
    },
    /// Turn the display on or off.
    DisplayPowerControl {
        /// Desired state.
        enable: bool,
    },
    /// Start or stop the slideshow.
    SlideshowControl {
        /// Desired state.
        enable: bool,
    },
    /// Show a short on-screen text.
    Notify {
        /// Text to display.
        text: Arc<str>,
    },
}

impl Event {
    /// Returns the signal identity of this event.
    pub fn signal(&self) -> Signal {
        match self {
            Event::Terminate => Signal::Terminate,
            Event::ButtonPressed(_) => Signal::ButtonPressed,
            Event::CameraMotionChanged { .. } => Signal::CameraMotionChanged,
            Event::SensorMotionChanged { .. } => Signal::SensorMotionChanged,
            Event::CameraStreamControl { .. } => Signal::CameraStreamControl,
            Event::DisplayPowerControl { .. } => Signal::DisplayPowerControl,
            Event::SlideshowControl { .. } => Signal::SlideshowControl,
            Event::Notify { .. } => Signal::Notify,
        }
    }

    /// Creates a `Notify` event.
    pub fn notify(text: impl Into<Arc<str>>) -> Self {
        Event::Notify { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_identity_matches_variant() {
        assert_eq!(Event::Terminate.signal(), Signal::Terminate);
        assert_eq!(
            Event::ButtonPressed(PressKind::Short).signal(),
            Signal::ButtonPressed
        );
        assert_eq!(
            Event::CameraStreamControl { enable: true }.signal(),
            Signal::CameraStreamControl
        );
        assert_eq!(Event::notify("hello").signal(), Signal::Notify);
    }
}
