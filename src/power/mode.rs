//! # Power behavior modes.
//!
//! Exactly one [`Mode`] is active at any instant; the power manager re-resolves
//! it from the weekly schedule once per control tick.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Mutually exclusive power-behavior states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Display defaults on; camera stream shown on motion or short press.
    AlwaysOn,
    /// Display driven by the PIR motion sensor with a hold timeout.
    MotionSensor,
    /// Display mirrors the camera stream.
    CameraMotion,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::AlwaysOn => "ALWAYS_ON",
            Mode::MotionSensor => "MOTION_SENSOR",
            Mode::CameraMotion => "CAMERA_MOTION",
        })
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALWAYS_ON" => Ok(Mode::AlwaysOn),
            "MOTION_SENSOR" => Ok(Mode::MotionSensor),
            "CAMERA_MOTION" => Ok(Mode::CameraMotion),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tokens() {
        assert_eq!("ALWAYS_ON".parse::<Mode>().unwrap(), Mode::AlwaysOn);
        assert_eq!("MOTION_SENSOR".parse::<Mode>().unwrap(), Mode::MotionSensor);
        assert_eq!("CAMERA_MOTION".parse::<Mode>().unwrap(), Mode::CameraMotion);
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert!("always_on".parse::<Mode>().is_err());
        assert!("OFF".parse::<Mode>().is_err());
    }

    #[test]
    fn display_roundtrips() {
        for mode in [Mode::AlwaysOn, Mode::MotionSensor, Mode::CameraMotion] {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
    }
}
