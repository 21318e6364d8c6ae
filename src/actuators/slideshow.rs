//! # Picture slideshow wrapper.
//!
//! Thin, passive wrapper that shells out to `feh`. Reacts only to
//! [`Event::SlideshowControl`]; a failure to spawn is logged and retried on
//! the next enable command, never fatal.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use crate::actuators::process;
use crate::events::Event;
use crate::runtime::Dispatch;

/// Shows a fullscreen, recursive picture slideshow via `feh`.
pub struct Slideshow {
    picture_dir: PathBuf,
    interval: Duration,
    child: Mutex<Option<Child>>,
}

impl Slideshow {
    /// Creates the wrapper; nothing is spawned until the first enable command.
    pub fn new(picture_dir: PathBuf, interval: Duration) -> Self {
        Self {
            picture_dir,
            interval,
            child: Mutex::new(None),
        }
    }

    fn spawn(&self) -> std::io::Result<Child> {
        Command::new("feh")
            .arg("--quiet")
            .arg("--fullscreen")
            .arg("--hide-pointer")
            .arg("--recursive")
            .arg(&self.picture_dir)
            .arg("--slideshow-delay")
            .arg(self.interval.as_secs().to_string())
            .arg("--reload")
            .arg("10")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    }

    async fn set_enabled(&self, enable: bool) {
        let mut slot = self.child.lock().await;
        let running = slot.as_mut().is_some_and(process::is_alive);

        if enable {
            if !running {
                match self.spawn() {
                    Ok(child) => {
                        tracing::info!(
                            dir = %self.picture_dir.display(),
                            interval_s = self.interval.as_secs(),
                            "slideshow started"
                        );
                        *slot = Some(child);
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "failed to start slideshow");
                    }
                }
            }
        } else if let Some(mut child) = slot.take() {
            if process::is_alive(&mut child) {
                process::terminate(&mut child, "feh").await;
                tracing::info!("slideshow stopped");
            }
        }
    }
}

#[async_trait]
impl Dispatch for Slideshow {
    async fn dispatch(&self, event: &Event) {
        match event {
            Event::SlideshowControl { enable } => self.set_enabled(*enable).await,
            // Shutdown: the child must not outlive the controller.
            Event::Terminate => self.set_enabled(false).await,
            _ => {}
        }
    }

    fn name(&self) -> &str {
        "slideshow"
    }
}
