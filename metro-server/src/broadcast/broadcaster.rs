//! Fan-out of train events to every live subscriber.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

use super::event::TrainEvent;
use super::subscriber::{ChannelSubscriber, DeliveryError, Subscriber};

/// Default buffer for channel subscribers.
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 64;

/// Handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Outcome of one publish pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: usize,
    /// Subscribers that failed and were removed.
    pub removed: Vec<(SubscriberId, DeliveryError)>,
}

/// The shared subscriber set.
///
/// Delivery never blocks: a subscriber that fails, for any reason, is
/// dropped once the current pass finishes. Events reach each subscriber in
/// publish order. Late subscribers see only events published after they
/// joined.
pub struct Broadcaster {
    subscribers: Mutex<Vec<(SubscriberId, Box<dyn Subscriber>)>>,
    next_id: AtomicU64,
    buffer: usize,
}

impl Broadcaster {
    pub fn new(buffer: usize) -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            buffer: buffer.max(1),
        }
    }

    pub async fn subscribe(&self, subscriber: Box<dyn Subscriber>) -> SubscriberId {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().await.push((id, subscriber));
        debug!(subscriber = %id, "Subscriber added");
        id
    }

    /// Subscribe with a bounded channel of the configured buffer size.
    pub async fn subscribe_channel(&self) -> (SubscriberId, mpsc::Receiver<TrainEvent>) {
        let (subscriber, receiver) = ChannelSubscriber::new(self.buffer);
        let id = self.subscribe(Box::new(subscriber)).await;
        (id, receiver)
    }

    /// Returns whether the subscriber was present.
    pub async fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.lock().await;
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        let removed = subscribers.len() != before;
        if removed {
            debug!(subscriber = %id, "Subscriber removed");
        }
        removed
    }

    /// Deliver `event` to every subscriber.
    ///
    /// The lock is held for the whole pass so a concurrent publish cannot
    /// interleave with this one for any subscriber.
    pub async fn publish(&self, event: &TrainEvent) -> PublishReport {
        let mut subscribers = self.subscribers.lock().await;
        let mut report = PublishReport::default();

        for (id, subscriber) in subscribers.iter() {
            match subscriber.deliver(event) {
                Ok(()) => report.delivered += 1,
                Err(err) => report.removed.push((*id, err)),
            }
        }

        if !report.removed.is_empty() {
            subscribers.retain(|(id, _)| !report.removed.iter().any(|(dead, _)| dead == id));
            for (id, err) in &report.removed {
                warn!(subscriber = %id, error = %err, "Dropping subscriber");
            }
        }

        report
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSCRIBER_BUFFER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::TrainState;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    /// Fails every delivery and counts attempts.
    struct Failing {
        attempts: Arc<AtomicUsize>,
    }

    impl Subscriber for Failing {
        fn deliver(&self, _event: &TrainEvent) -> Result<(), DeliveryError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(DeliveryError::Disconnected)
        }
    }

    fn progress(p: f64) -> TrainEvent {
        TrainEvent::segment_update("T1", "A", "B", p)
    }

    #[tokio::test]
    async fn failing_subscriber_excluded_from_later_publishes() {
        let broadcaster = Broadcaster::default();
        let attempts = Arc::new(AtomicUsize::new(0));
        let bad = broadcaster
            .subscribe(Box::new(Failing {
                attempts: attempts.clone(),
            }))
            .await;
        let (_, mut rx) = broadcaster.subscribe_channel().await;

        let first = broadcaster.publish(&progress(0.0)).await;
        assert_eq!(first.delivered, 1);
        assert_eq!(first.removed, vec![(bad, DeliveryError::Disconnected)]);

        let second = broadcaster.publish(&progress(0.5)).await;
        assert_eq!(second.delivered, 1);
        assert!(second.removed.is_empty());

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(broadcaster.subscriber_count().await, 1);
        assert_eq!(rx.recv().await.unwrap(), progress(0.0));
        assert_eq!(rx.recv().await.unwrap(), progress(0.5));
    }

    #[tokio::test]
    async fn order_preserved_per_subscriber() {
        let broadcaster = Broadcaster::new(16);
        let (_, mut rx) = broadcaster.subscribe_channel().await;

        for i in 0..10 {
            broadcaster.publish(&progress(i as f64 / 10.0)).await;
        }
        for i in 0..10 {
            assert_eq!(rx.recv().await.unwrap(), progress(i as f64 / 10.0));
        }
    }

    #[tokio::test]
    async fn late_subscriber_gets_no_replay() {
        let broadcaster = Broadcaster::default();
        broadcaster
            .publish(&TrainEvent::status("T1", TrainState::Started))
            .await;

        let (_, mut rx) = broadcaster.subscribe_channel().await;
        assert!(rx.try_recv().is_err());

        broadcaster.publish(&progress(1.0)).await;
        assert_eq!(rx.recv().await.unwrap(), progress(1.0));
    }

    #[tokio::test]
    async fn slow_subscriber_dropped_without_blocking() {
        let broadcaster = Broadcaster::new(1);
        let (slow, _slow_rx) = broadcaster.subscribe_channel().await;
        let (_, mut fast_rx) = broadcaster.subscribe_channel().await;

        broadcaster.publish(&progress(0.0)).await;
        assert_eq!(fast_rx.recv().await.unwrap(), progress(0.0));

        let report = broadcaster.publish(&progress(0.5)).await;
        assert_eq!(report.removed, vec![(slow, DeliveryError::Lagging)]);
        assert_eq!(fast_rx.recv().await.unwrap(), progress(0.5));
    }

    #[tokio::test]
    async fn unsubscribe_reports_presence() {
        let broadcaster = Broadcaster::default();
        let (id, _rx) = broadcaster.subscribe_channel().await;

        assert!(broadcaster.unsubscribe(id).await);
        assert!(!broadcaster.unsubscribe(id).await);
        assert_eq!(broadcaster.subscriber_count().await, 0);
    }

    #[tokio::test]
    async fn dropped_receiver_removed_on_next_publish() {
        let broadcaster = Broadcaster::default();
        let (id, rx) = broadcaster.subscribe_channel().await;
        drop(rx);

        let report = broadcaster.publish(&progress(0.0)).await;
        assert_eq!(report.delivered, 0);
        assert_eq!(report.removed, vec![(id, DeliveryError::Disconnected)]);
        assert_eq!(broadcaster.subscriber_count().await, 0);
    }
}
