//! Error types used by the framevisor runtime and tasks.
//!
//! Three layers, matching the failure taxonomy:
//!
//! - [`ConfigError`] — malformed command-line input; fatal at startup, before
//!   any task starts.
//! - [`TaskError`] — errors raised by individual task executions.
//!   [`TaskError::Canceled`] is a graceful exit, never treated as an error.
//! - [`RuntimeError`] — top-level process errors (startup I/O, GPIO binding).
//!
//! Actuator failures (an external program failing to spawn or dying) are *not*
//! errors at this level: they are logged by the wrapper and retried on the next
//! control command.

use thiserror::Error;

/// Errors produced while validating command-line configuration.
///
/// Any of these aborts the process with a non-zero status before the event
/// system is wired up.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Listen address did not parse as `ip:port`.
    #[error("invalid listen address '{0}': expected ip:port")]
    InvalidListenAddr(String),

    /// Schedule string violated the `weekday,start,end,mode` grammar.
    #[error("invalid schedule '{value}': {reason}")]
    InvalidSchedule {
        /// The offending schedule string.
        value: String,
        /// What exactly was wrong with it.
        reason: String,
    },

    /// Weekday token was not a day name, `Weekday`, `Weekend` or `Anyday`.
    #[error("unknown weekday '{0}'")]
    UnknownWeekday(String),

    /// Mode token was not `ALWAYS_ON`, `MOTION_SENSOR` or `CAMERA_MOTION`.
    #[error("unknown power mode '{0}'")]
    UnknownMode(String),

    /// Time-of-day token did not parse as `HH:MM`.
    #[error("invalid time '{0}': expected HH:MM")]
    InvalidTime(String),
}

/// Errors produced by task execution.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Task execution failed; the supervisor reacts by cascading shutdown.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task was cancelled cooperatively. Graceful exit, not a failure.
    #[error("context cancelled")]
    Canceled,
}

impl TaskError {
    /// Wraps an arbitrary error as a task failure.
    pub fn fail(err: impl std::fmt::Display) -> Self {
        TaskError::Fail {
            error: err.to_string(),
        }
    }
}

/// Top-level process errors.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration rejected at startup.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Startup I/O failure (e.g. opening the log file).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// GPIO line could not be bound.
    #[error("gpio error: {0}")]
    Gpio(String),
}
