//! # Runtime configuration.
//!
//! [`Config`] is the validated result of command-line parsing; everything in
//! it has already passed the grammar checks, so the wiring code never sees a
//! malformed value. Parse failures are [`ConfigError`]s and fatal before any
//! task starts.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::power::PowerSchedule;

/// Default HTTP bind address for the motion endpoint.
pub const DEFAULT_LISTEN: &str = "0.0.0.0:10042";

/// Default seconds each slideshow picture is shown.
pub const DEFAULT_SLIDESHOW_INTERVAL: u64 = 15;

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address of the HTTP motion endpoint.
    pub listen: SocketAddr,
    /// Camera stream URL shown on motion.
    pub stream_url: String,
    /// Picture directory; slideshow disabled when absent.
    pub picture_dir: Option<PathBuf>,
    /// Time each picture is shown.
    pub slideshow_interval: Duration,
    /// BCM line of the push button, if wired.
    pub button_gpio: Option<u8>,
    /// BCM line of the PIR motion sensor, if wired.
    pub motion_gpio: Option<u8>,
    /// Weekly power schedule, in declaration order.
    pub schedules: Vec<PowerSchedule>,
    /// Display hold after sensor motion ended.
    pub motion_timeout: Duration,
    /// Raise log level to debug.
    pub verbose: bool,
    /// Write logs to this file instead of stdout.
    pub log_file: Option<PathBuf>,
}

/// Parses the `ip:port` listen address.
pub fn parse_listen_addr(s: &str) -> Result<SocketAddr, ConfigError> {
    s.parse()
        .map_err(|_| ConfigError::InvalidListenAddr(s.to_string()))
}
