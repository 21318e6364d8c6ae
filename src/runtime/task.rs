//! # Task abstraction and lifecycle handle.
//!
//! A [`Task`] is a long-running async unit with a stable name and a cancelable
//! `run` method. [`TaskHandle`] wraps a spawned task and exposes the lifecycle
//! operations the rest of the system relies on: request-stop, join, liveness.
//!
//! ## Cancellation
//! The only cancellation primitive is the task's [`CancellationToken`]:
//! cooperative (the run loop must poll it) and idempotent (cancelling twice is
//! harmless). A handle also implements [`Dispatch`], giving every task the
//! universal default: on [`Event::Terminate`], if still running, request stop
//! and join.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::events::Event;
use crate::runtime::Dispatch;

/// Asynchronous, cancelable unit of work.
///
/// Implementations should regularly check `ctx.is_cancelled()` (or select on
/// `ctx.cancelled()`) and exit promptly during shutdown.
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Executes the task until completion or cancellation.
    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError>;
}

/// Lifecycle handle for a spawned [`Task`].
///
/// Cloneable via `Arc`; `join` is idempotent (the underlying join handle is
/// consumed on first use).
pub struct TaskHandle {
    name: Arc<str>,
    token: CancellationToken,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl TaskHandle {
    /// Spawns `task` on the runtime with a child token of `parent`.
    pub fn spawn(task: Arc<dyn Task>, parent: &CancellationToken) -> Arc<Self> {
        let token = parent.child_token();
        let name: Arc<str> = task.name().into();
        let ctx = token.clone();
        let log_name = Arc::clone(&name);
        let handle = tokio::spawn(async move {
            match task.run(ctx).await {
                Ok(()) | Err(TaskError::Canceled) => {
                    tracing::debug!(task = %log_name, "task stopped");
                }
                Err(err) => {
                    tracing::error!(task = %log_name, error = %err, "task failed");
                }
            }
        });
        Arc::new(Self {
            name,
            token,
            join: Mutex::new(Some(handle)),
        })
    }

    /// Name of the wrapped task.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Requests cooperative exit by cancelling the task's token.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Waits until the task function has returned. Idempotent.
    pub async fn join(&self) {
        let handle = self.join.lock().await.take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    /// Reports liveness: `true` while the task function has not returned.
    pub async fn is_running(&self) -> bool {
        self.join
            .lock()
            .await
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

#[async_trait]
impl Dispatch for TaskHandle {
    /// Universal task default: `Terminate` stops and joins; everything else is
    /// ignored.
    async fn dispatch(&self, event: &Event) {
        if matches!(event, Event::Terminate) && self.is_running().await {
            self.stop();
            self.join().await;
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    struct Looper;

    #[async_trait]
    impl Task for Looper {
        fn name(&self) -> &str {
            "looper"
        }

        async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
            ctx.cancelled().await;
            Err(TaskError::Canceled)
        }
    }

    struct OneShot;

    #[async_trait]
    impl Task for OneShot {
        fn name(&self) -> &str {
            "one-shot"
        }

        async fn run(&self, _ctx: CancellationToken) -> Result<(), TaskError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn stop_and_join_end_a_running_task() {
        let root = CancellationToken::new();
        let handle = TaskHandle::spawn(Arc::new(Looper), &root);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(handle.is_running().await);

        handle.stop();
        handle.join().await;
        assert!(!handle.is_running().await);
    }

    #[tokio::test]
    async fn terminate_dispatch_is_idempotent() {
        let root = CancellationToken::new();
        let handle = TaskHandle::spawn(Arc::new(Looper), &root);
        tokio::time::sleep(Duration::from_millis(10)).await;

        handle.dispatch(&Event::Terminate).await;
        assert!(!handle.is_running().await);
        // Second terminate on a stopped task is a no-op.
        handle.dispatch(&Event::Terminate).await;
    }

    #[tokio::test]
    async fn finished_task_reports_not_running() {
        let root = CancellationToken::new();
        let handle = TaskHandle::spawn(Arc::new(OneShot), &root);
        handle.join().await;
        assert!(!handle.is_running().await);
    }

    #[tokio::test]
    async fn parent_cancellation_propagates() {
        let root = CancellationToken::new();
        let handle = TaskHandle::spawn(Arc::new(Looper), &root);
        tokio::time::sleep(Duration::from_millis(10)).await;
        root.cancel();
        handle.join().await;
        assert!(!handle.is_running().await);
    }
}
