//! Subscriber interface.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::event::TrainEvent;

/// Why a delivery failed. Either way the subscriber is considered dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The subscriber's buffer is full; it is not draining.
    #[error("subscriber is not keeping up")]
    Lagging,

    /// The receiving side is gone.
    #[error("subscriber disconnected")]
    Disconnected,
}

/// Something that receives broadcast events.
///
/// `deliver` must not block: it either accepts the event immediately or
/// reports failure, so one slow subscriber cannot stall the publisher.
pub trait Subscriber: Send + Sync {
    fn deliver(&self, event: &TrainEvent) -> Result<(), DeliveryError>;
}

/// A subscriber backed by a bounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSubscriber {
    sender: mpsc::Sender<TrainEvent>,
}

impl ChannelSubscriber {
    /// Create a subscriber and the receiver that drains it.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<TrainEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl Subscriber for ChannelSubscriber {
    fn deliver(&self, event: &TrainEvent) -> Result<(), DeliveryError> {
        self.sender.try_send(event.clone()).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::Lagging,
            TrySendError::Closed(_) => DeliveryError::Disconnected,
        })
    }
}
