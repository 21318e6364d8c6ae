//! # Camera stream wrapper.
//!
//! Thin, passive wrapper that shells out to `omxplayer` for the live camera
//! stream (RTSP over TCP). Reacts only to [`Event::CameraStreamControl`];
//! spawn failures are logged and retried on the next enable command.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use crate::actuators::process;
use crate::events::Event;
use crate::runtime::Dispatch;

/// Shows the live camera stream via `omxplayer`.
pub struct CameraStream {
    stream_url: String,
    child: Mutex<Option<Child>>,
}

impl CameraStream {
    /// Creates the wrapper for the given stream URL.
    pub fn new(stream_url: String) -> Self {
        Self {
            stream_url,
            child: Mutex::new(None),
        }
    }

    fn spawn(&self) -> std::io::Result<Child> {
        Command::new("omxplayer")
            .arg("--avdict")
            .arg("rtsp_transport:tcp")
            .arg("--live")
            .arg(&self.stream_url)
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
                        tracing::info!("camera stream started");
                        *slot = Some(child);
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "failed to start camera stream");
                    }
                }
            }
        } else if let Some(mut child) = slot.take() {
            if process::is_alive(&mut child) {
                process::terminate(&mut child, "omxplayer").await;
                tracing::info!("camera stream stopped");
            }
        }
    }
}

#[async_trait]
impl Dispatch for CameraStream {
    async fn dispatch(&self, event: &Event) {
        match event {
            Event::CameraStreamControl { enable } => self.set_enabled(*enable).await,
            // Shutdown: the child must not outlive the controller.
            Event::Terminate => self.set_enabled(false).await,
            _ => {}
        }
    }

    fn name(&self) -> &str {
        "camera-stream"
    }
}
