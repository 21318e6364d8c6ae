//! # Supervisor: liveness watchdog with cascading shutdown.
//!
//! The [`Supervisor`] is itself a [`Task`]. Its run loop polls the liveness of
//! a fixed list of [`TaskHandle`]s at a short interval; the instant any
//! watched task is no longer running it leaves the loop. On exit — for any
//! reason, including external stop — it delivers [`Event::Terminate`] to every
//! watched handle exactly once, joining each in turn.
//!
//! One task's unexpected death therefore brings the whole process down in a
//! controlled, ordered way instead of leaving a half-running system. The
//! supervisor never sees domain events; it only watches liveness.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::events::Event;
use crate::runtime::{Dispatch, Task, TaskHandle};

/// Default liveness poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Watches task liveness and cascades shutdown on first failure.
pub struct Supervisor {
    watched: Vec<Arc<TaskHandle>>,
    poll_interval: Duration,
}

impl Supervisor {
    /// Creates a supervisor over a fixed list of handles.
    pub fn new(watched: Vec<Arc<TaskHandle>>) -> Self {
        Self::with_poll_interval(watched, DEFAULT_POLL_INTERVAL)
    }

    /// Creates a supervisor with a custom liveness poll interval.
    pub fn with_poll_interval(watched: Vec<Arc<TaskHandle>>, poll_interval: Duration) -> Self {
        Self {
            watched,
            poll_interval,
        }
    }

    /// Returns the name of the first watched task that stopped, if any.
    async fn find_stopped(&self) -> Option<&str> {
        for handle in &self.watched {
            if !handle.is_running().await {
                return Some(handle.name());
            }
        }
        None
    }
}

#[async_trait]
impl Task for Supervisor {
    fn name(&self) -> &str {
        "supervisor"
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
        'watch: loop {
            if let Some(name) = self.find_stopped().await {
                tracing::warn!(task = name, "supervised task stopped unexpectedly");
                break 'watch;
            }
            tokio::select! {
                _ = ctx.cancelled() => break 'watch,
                _ = time::sleep(self.poll_interval) => {}
            }
        }

        // Exactly once, on every exit path: cascade Terminate to all watched
        // tasks and wait for orderly unwind.
        tracing::info!("stopping all supervised tasks");
        for handle in &self.watched {
            handle.dispatch(&Event::Terminate).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Looper(&'static str);

    #[async_trait]
    impl Task for Looper {
        fn name(&self) -> &str {
            self.0
        }

        async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
            ctx.cancelled().await;
            Err(TaskError::Canceled)
        }
    }

    struct DiesQuickly;

    #[async_trait]
    impl Task for DiesQuickly {
        fn name(&self) -> &str {
            "dies-quickly"
        }

        async fn run(&self, _ctx: CancellationToken) -> Result<(), TaskError> {
            time::sleep(Duration::from_millis(20)).await;
            Err(TaskError::fail("boom"))
        }
    }

    #[tokio::test]
    async fn one_death_cascades_to_all_watched_tasks() {
        let root = CancellationToken::new();
        let a = TaskHandle::spawn(Arc::new(Looper("a")), &root);
        let b = TaskHandle::spawn(Arc::new(Looper("b")), &root);
        let dying = TaskHandle::spawn(Arc::new(DiesQuickly), &root);

        let sup = Supervisor::with_poll_interval(
            vec![Arc::clone(&a), Arc::clone(&b), Arc::clone(&dying)],
            Duration::from_millis(10),
        );
        let sup_handle = TaskHandle::spawn(Arc::new(sup), &root);

        sup_handle.join().await;
        assert!(!a.is_running().await);
        assert!(!b.is_running().await);
        assert!(!dying.is_running().await);
    }

    #[tokio::test]
    async fn external_stop_also_cascades() {
        let root = CancellationToken::new();
        let a = TaskHandle::spawn(Arc::new(Looper("a")), &root);

        let sup =
            Supervisor::with_poll_interval(vec![Arc::clone(&a)], Duration::from_millis(10));
        let sup_handle = TaskHandle::spawn(Arc::new(sup), &root);
        time::sleep(Duration::from_millis(30)).await;
        assert!(a.is_running().await);

        // The graceful-shutdown path: Terminate dispatched to the supervisor.
        sup_handle.dispatch(&Event::Terminate).await;
        assert!(!sup_handle.is_running().await);
        assert!(!a.is_running().await);
    }
}
