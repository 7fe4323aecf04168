//! Infrastructure layer
//!
//! Storage, presence, credential and event-channel implementations of the
//! ports defined by the domain layer, plus the wire DTOs.

pub mod auth;
pub mod dto;
pub mod event;
pub mod identity;
pub mod presence;
pub mod repository;

pub use auth::JwtTokenService;
pub use event::ChannelEventPublisher;
pub use identity::InMemoryIdentityStore;
pub use presence::InMemoryPresenceRegistry;
pub use repository::{InMemoryMessageRepository, InMemoryRoomRepository};
