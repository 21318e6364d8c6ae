//! # Child-process helpers shared by the actuator wrappers.
//!
//! Termination is cooperative first: SIGTERM, then SIGKILL if the process
//! tree did not exit within a short grace period.

use std::time::Duration;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::process::Child;
use tokio::time;

/// How long a child gets to exit after SIGTERM before being killed.
const TERM_GRACE: Duration = Duration::from_secs(3);

/// True while the child has not exited.
pub(crate) fn is_alive(child: &mut Child) -> bool {
    matches!(child.try_wait(), Ok(None))
}

/// Terminates `child`: SIGTERM, a short wait, then SIGKILL as a last resort.
pub(crate) async fn terminate(child: &mut Child, name: &str) {
    if let Some(pid) = child.id() {
        let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
        match time::timeout(TERM_GRACE, child.wait()).await {
            Ok(_) => return,
            Err(_) => {
                tracing::warn!(process = name, "did not exit after SIGTERM; killing");
            }
        }
    }
    if let Err(err) = child.kill().await {
        tracing::warn!(process = name, error = %err, "failed to kill process");
    }
}

#[cfg(test)]
mod tests {
    use tokio::process::Command;

    use super::*;

    #[tokio::test]
    async fn terminate_ends_a_sleeping_child() {
        let mut child = Command::new("sleep")
            .arg("30")
            .spawn()
            .expect("spawn sleep");
        assert!(is_alive(&mut child));
        terminate(&mut child, "sleep").await;
        assert!(!is_alive(&mut child));
    }

    #[tokio::test]
    async fn is_alive_reports_exit() {
        let mut child = Command::new("true").spawn().expect("spawn true");
        let _ = child.wait().await;
        assert!(!is_alive(&mut child));
    }
}
