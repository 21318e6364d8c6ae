//! # Display power wrapper.
//!
//! Stateless wrapper around `vcgencmd display_power`. Reacts only to
//! [`Event::DisplayPowerControl`]; command failures are logged, never fatal.

use async_trait::async_trait;
use tokio::process::Command;

use crate::events::Event;
use crate::runtime::Dispatch;

/// Switches the display on or off via `vcgencmd`.
pub struct DisplayPower;

impl DisplayPower {
    /// Creates the wrapper.
    pub fn new() -> Self {
        Self
    }

    async fn power(&self, enable: bool) {
        let result = Command::new("vcgencmd")
            .arg("display_power")
            .arg(if enable { "1" } else { "0" })
            .output()
            .await;

        match result {
            Ok(output) => {
                tracing::info!(on = enable, "display power switched");
                if !output.stderr.is_empty() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    tracing::error!(stderr = %stderr.trim(), "vcgencmd reported an error");
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to run vcgencmd");
            }
        }
    }
}

impl Default for DisplayPower {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Dispatch for DisplayPower {
    async fn dispatch(&self, event: &Event) {
        if let Event::DisplayPowerControl { enable } = event {
            self.power(*enable).await;
        }
    }

    fn name(&self) -> &str {
        "display-power"
    }
}
