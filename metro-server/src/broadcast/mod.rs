//! Live event fan-out.
//!
//! Simulated trains publish [`TrainEvent`]s here; WebSocket clients and
//! other listeners subscribe. A failing subscriber is removed and never
//! affects delivery to the others.

mod broadcaster;
mod event;
mod subscriber;

pub use broadcaster::{Broadcaster, DEFAULT_SUBSCRIBER_BUFFER, PublishReport, SubscriberId};
pub use event::{TrainEvent, TrainState};
pub use subscriber::{ChannelSubscriber, DeliveryError, Subscriber};
