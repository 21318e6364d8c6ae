//! # Shared event channel.
//!
//! One unbounded FIFO queue carries every [`Event`] from producers to the
//! dispatcher. [`EventTx`] is the producer half: cheap to clone, safe to use
//! from any task or interrupt callback, and `send` never blocks. [`EventRx`]
//! is consumed by exactly one reader (the dispatcher).
//!
//! ## Ordering
//! Enqueue order is preserved globally across all producers; ties are broken
//! by enqueue order, never by content. This is what makes the dispatcher's
//! per-event fan-out deterministic end to end.

use tokio::sync::mpsc;

use super::event::Event;

/// Producer half of the shared channel.
///
/// `send` never blocks. Once the dispatcher has gone away (shutdown) sends are
/// silently dropped; by that point nobody is left to act on them.
#[derive(Clone, Debug)]
pub struct EventTx {
    tx: mpsc::UnboundedSender<Event>,
}

impl EventTx {
    /// Enqueues one event.
    pub fn send(&self, event: Event) {
        let _ = self.tx.send(event);
    }
}

/// Consumer half of the shared channel; owned by the dispatcher.
#[derive(Debug)]
pub struct EventRx {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventRx {
    /// Awaits the oldest pending event.
    ///
    /// Returns `None` once every producer handle has been dropped.
    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Returns the oldest pending event without waiting, if any.
    pub fn try_recv(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

/// Creates the shared channel.
pub fn channel() -> (EventTx, EventRx) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventTx { tx }, EventRx { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::PressKind;

    #[tokio::test]
    async fn preserves_fifo_order_from_one_producer() {
        let (tx, mut rx) = channel();
        for i in 0..10 {
            tx.send(Event::Notify {
                text: i.to_string().into(),
            });
        }
        for i in 0..10 {
            match rx.recv().await {
                Some(Event::Notify { text }) => assert_eq!(&*text, &i.to_string()),
                other => panic!("unexpected event: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn delivers_every_event_from_concurrent_producers_exactly_once() {
        let (tx, mut rx) = channel();
        let mut handles = Vec::new();
        for p in 0..4u32 {
            let tx = tx.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..25u32 {
                    tx.send(Event::Notify {
                        text: format!("{p}:{i}").into(),
                    });
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        drop(tx);

        let mut seen = std::collections::HashSet::new();
        let mut per_producer_last: [i64; 4] = [-1; 4];
        while let Some(Event::Notify { text }) = rx.recv().await {
            let (p, i) = text.split_once(':').unwrap();
            let (p, i): (usize, i64) = (p.parse().unwrap(), i.parse().unwrap());
            assert!(seen.insert(text.to_string()), "duplicate delivery");
            // Per-producer order must survive interleaving.
            assert!(i > per_producer_last[p]);
            per_producer_last[p] = i;
        }
        assert_eq!(seen.len(), 100);
    }

    #[tokio::test]
    async fn try_recv_reports_empty() {
        let (tx, mut rx) = channel();
        assert!(rx.try_recv().is_none());
        tx.send(Event::ButtonPressed(PressKind::Short));
        assert!(rx.try_recv().is_some());
        assert!(rx.try_recv().is_none());
    }
}
