//! # Event dispatcher: single reader of the channel, fan-out to all consumers.
//!
//! The [`Dispatcher`] drains the shared channel one event at a time and
//! delivers each event synchronously, in fixed registration order, to every
//! registered [`Dispatch`] consumer before dequeuing the next.
//!
//! ## Ordering guarantees
//! - Events are delivered in enqueue order, globally across all producers.
//! - Within one event, consumers observe it in registration order and the next
//!   consumer is not invoked until the previous `dispatch` returned. Two
//!   consumers reacting to the same event therefore never race over its effect.
//!
//! ## Termination
//! The dispatcher is itself a [`Task`]. It exits when it observes
//! [`Event::Terminate`] (after delivering it) or when its cancellation token
//! fires. Events still queued at that point stay undelivered — shutdown does
//! not drain the channel.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::events::{Event, EventRx};
use crate::runtime::{Dispatch, Task};

/// Drains the channel and fans each event out to all consumers.
pub struct Dispatcher {
    consumers: Vec<Arc<dyn Dispatch>>,
    rx: Mutex<Option<EventRx>>,
}

impl Dispatcher {
    /// Creates a dispatcher over `rx` with a fixed, ordered consumer list.
    pub fn new(rx: EventRx, consumers: Vec<Arc<dyn Dispatch>>) -> Self {
        Self {
            consumers,
            rx: Mutex::new(Some(rx)),
        }
    }

    async fn deliver(&self, event: &Event) {
        for consumer in &self.consumers {
            consumer.dispatch(event).await;
        }
    }
}

#[async_trait]
impl Task for Dispatcher {
    fn name(&self) -> &str {
        "dispatcher"
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
        let mut rx = self
            .rx
            .lock()
            .await
            .take()
            .ok_or_else(|| TaskError::fail("dispatcher started twice"))?;

        loop {
            let event = tokio::select! {
                _ = ctx.cancelled() => return Err(TaskError::Canceled),
                event = rx.recv() => match event {
                    Some(event) => event,
                    // All producers gone; nothing left to dispatch.
                    None => return Ok(()),
                },
            };

            tracing::trace!(signal = ?event.signal(), "dispatching event");
            let terminate = matches!(event, Event::Terminate);
            self.deliver(&event).await;
            if terminate {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use super::*;
    use crate::events::{channel, PressKind};
    use crate::runtime::TaskHandle;

    /// Records `(consumer id, event index)` pairs into a shared journal.
    struct Recorder {
        id: usize,
        journal: Arc<StdMutex<Vec<(usize, String)>>>,
    }

    #[async_trait]
    impl Dispatch for Recorder {
        async fn dispatch(&self, event: &Event) {
            if let Event::Notify { text } = event {
                self.journal
                    .lock()
                    .unwrap()
                    .push((self.id, text.to_string()));
            }
        }
    }

    fn recorders(n: usize) -> (Vec<Arc<dyn Dispatch>>, Arc<StdMutex<Vec<(usize, String)>>>) {
        let journal = Arc::new(StdMutex::new(Vec::new()));
        let consumers = (0..n)
            .map(|id| {
                Arc::new(Recorder {
                    id,
                    journal: Arc::clone(&journal),
                }) as Arc<dyn Dispatch>
            })
            .collect();
        (consumers, journal)
    }

    #[tokio::test]
    async fn delivers_each_event_to_each_consumer_in_order() {
        let (tx, rx) = channel();
        let (consumers, journal) = recorders(3);
        let dispatcher = Arc::new(Dispatcher::new(rx, consumers));

        for i in 0..5 {
            tx.send(Event::notify(i.to_string()));
        }
        tx.send(Event::Terminate);

        let root = CancellationToken::new();
        let handle = TaskHandle::spawn(dispatcher, &root);
        handle.join().await;

        let journal = journal.lock().unwrap();
        // 5 events x 3 consumers, grouped per event, consumers in
        // registration order within each group.
        assert_eq!(journal.len(), 15);
        for (i, chunk) in journal.chunks(3).enumerate() {
            for (consumer, (id, text)) in chunk.iter().enumerate() {
                assert_eq!(*id, consumer);
                assert_eq!(text, &i.to_string());
            }
        }
    }

    #[tokio::test]
    async fn terminate_stops_dispatcher_leaving_queue_undrained() {
        let (tx, rx) = channel();
        let (consumers, journal) = recorders(1);
        let dispatcher = Arc::new(Dispatcher::new(rx, consumers));

        tx.send(Event::notify("before"));
        tx.send(Event::Terminate);
        // Queued behind Terminate; must never be delivered.
        tx.send(Event::notify("after"));

        let root = CancellationToken::new();
        let handle = TaskHandle::spawn(dispatcher, &root);
        handle.join().await;

        let journal = journal.lock().unwrap();
        assert_eq!(journal.len(), 1);
        assert_eq!(journal[0].1, "before");
    }

    #[tokio::test]
    async fn cancellation_stops_an_idle_dispatcher() {
        let (tx, rx) = channel();
        let (consumers, _journal) = recorders(1);
        let dispatcher = Arc::new(Dispatcher::new(rx, consumers));

        let root = CancellationToken::new();
        let handle = TaskHandle::spawn(dispatcher, &root);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(handle.is_running().await);

        handle.stop();
        handle.join().await;
        assert!(!handle.is_running().await);
        drop(tx);
    }

    #[tokio::test]
    async fn ignores_unrelated_signals() {
        let (tx, rx) = channel();
        let (consumers, journal) = recorders(2);
        let dispatcher = Arc::new(Dispatcher::new(rx, consumers));

        tx.send(Event::ButtonPressed(PressKind::Long));
        tx.send(Event::Terminate);

        let root = CancellationToken::new();
        let handle = TaskHandle::spawn(dispatcher, &root);
        handle.join().await;
        assert!(journal.lock().unwrap().is_empty());
    }
}
