//! In-process event channel between the coordinator and the realtime layer.

use tokio::sync::mpsc;

use crate::domain::{DomainEvent, EventPublisher};

/// Publishes domain events into an unbounded mpsc channel.
///
/// A single consumer drains the channel, so events are observed in the order
/// they were published.
#[derive(Clone)]
pub struct ChannelEventPublisher {
    sender: mpsc::UnboundedSender<DomainEvent>,
}

impl ChannelEventPublisher {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DomainEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventPublisher for ChannelEventPublisher {
    fn publish(&self, event: DomainEvent) {
        tracing::debug!(room_id = %event.room_id(), ?event, "publishing domain event");
        if self.sender.send(event).is_err() {
            tracing::warn!("domain event dropped: no consumer is running");
        }
    }
}
