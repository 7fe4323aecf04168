//! Domain events published by the Room Membership Coordinator.
//!
//! The realtime layer consumes these to keep broadcast groups in line with
//! durable membership, so the coordinator never calls into the transport.

use super::value_object::{IdentityId, RoomId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    RoomCreated {
        room_id: RoomId,
        creator: IdentityId,
    },
    ParticipantAdded {
        room_id: RoomId,
        identity: IdentityId,
    },
    ParticipantRemoved {
        room_id: RoomId,
        identity: IdentityId,
        remaining: usize,
    },
    RoomDeleted {
        room_id: RoomId,
        deleted_message_count: usize,
    },
}

impl DomainEvent {
    pub fn room_id(&self) -> &RoomId {
        match self {
            DomainEvent::RoomCreated { room_id, .. }
            | DomainEvent::ParticipantAdded { room_id, .. }
            | DomainEvent::ParticipantRemoved { room_id, .. }
            | DomainEvent::RoomDeleted { room_id, .. } => room_id,
        }
    }
}

/// Outbound side of the event boundary.
///
/// A cross-process pub/sub fan-out plugs in here as another implementation.
#[cfg_attr(test, mockall::automock)]
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: DomainEvent);
}
