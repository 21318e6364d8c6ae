//! # On-screen notifier.
//!
//! Hybrid consumer: [`Event::Notify`] latches the text, and the notifier's own
//! loop shows the latest latched text via `aosd_cat`. Showing happens off the
//! dispatch path so a slow overlay never stalls event delivery.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::events::Event;
use crate::runtime::{Dispatch, Task};

/// Poll interval of the show loop.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Shows on-screen notifications via `aosd_cat`.
pub struct Notifier {
    text: Mutex<Option<Arc<str>>>,
}

impl Notifier {
    /// Creates the notifier with an empty latch.
    pub fn new() -> Self {
        Self {
            text: Mutex::new(None),
        }
    }

    async fn show(&self, text: &str) {
        let spawned = Command::new("aosd_cat")
            .args(["--fore-color", "white"])
            .args(["--font", "Helvetica 20"])
            .args(["--position", "8"])
            .args(["--x-offset", "-50"])
            .args(["--fade-in", "100"])
            .args(["--fade-full", "1000"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(err) => {
                tracing::warn!(error = %err, text, "cannot show notification, aosd_cat unavailable");
                return;
            }
        };

        tracing::debug!(text, "showing notification");
        if let Some(mut stdin) = child.stdin.take() {
            let _ = stdin.write_all(text.as_bytes()).await;
        }
        let _ = child.wait().await;
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Task for Notifier {
    fn name(&self) -> &str {
        "notifier"
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
        tracing::info!("notifier started");
        loop {
            let pending = self.text.lock().await.take();
            if let Some(text) = pending {
                self.show(&text).await;
            }
            tokio::select! {
                _ = ctx.cancelled() => break,
                _ = time::sleep(POLL_INTERVAL) => {}
            }
        }
        tracing::info!("notifier stopped");
        Ok(())
    }
}

#[async_trait]
impl Dispatch for Notifier {
    async fn dispatch(&self, event: &Event) {
        if let Event::Notify { text } = event {
            // Latest text wins; the loop shows whatever is latched next poll.
            *self.text.lock().await = Some(Arc::clone(text));
        }
    }

    fn name(&self) -> &str {
        "notifier"
    }
}
