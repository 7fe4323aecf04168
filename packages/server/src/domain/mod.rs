//! Domain layer for the chat application.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod identity;
pub mod presence;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, DEFAULT_PARTICIPANT_CAPACITY, Room, RoomSummary};
pub use error::{AuthError, RepositoryError, RoomError, ValueObjectError};
pub use event::{DomainEvent, EventPublisher};
pub use factory::{ConnectionIdFactory, MessageIdFactory, RoomIdFactory};
pub use identity::{IdentityStore, TokenService};
pub use presence::PresenceRegistry;
pub use repository::{MessageRepository, RoomRepository};
#[cfg(test)]
pub use event::MockEventPublisher;
#[cfg(test)]
pub use repository::MockRoomRepository;
#[cfg(test)]
pub use identity::{MockIdentityStore, MockTokenService};
pub use value_object::{
    ConnectionId, HistoryLimit, IdentityId, MESSAGE_CONTENT_MAX_LENGTH, MessageContent,
    MessageCursor, MessageId, RoomId, RoomTitle, Timestamp,
};
