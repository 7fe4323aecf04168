//! Storage ports for the durable room graph and the Message Log.
//!
//! The domain layer owns these traits; infrastructure provides the
//! implementations (dependency inversion). Every mutating method is a single
//! atomic step at the storage layer: callers never check in one call and act
//! in a later one.

use async_trait::async_trait;

use super::{
    entity::{ChatMessage, Room},
    error::RepositoryError,
    value_object::{IdentityId, MessageCursor, RoomId},
};

/// Durable storage of rooms and their participant sets
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Store a freshly created room.
    async fn insert(&self, room: Room) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, room_id: &RoomId) -> Result<Option<Room>, RepositoryError>;

    /// Conditionally add `identity` to the participant set.
    ///
    /// Returns `Ok(false)` when already present. Never creates a room:
    /// a missing room is `RepositoryError::RoomNotFound`.
    async fn add_participant(
        &self,
        room_id: &RoomId,
        identity: &IdentityId,
    ) -> Result<bool, RepositoryError>;

    /// Remove `identity` if it is currently a participant and report how many
    /// participants remain.
    async fn remove_participant(
        &self,
        room_id: &RoomId,
        identity: &IdentityId,
    ) -> Result<usize, RepositoryError>;

    async fn is_participant(
        &self,
        room_id: &RoomId,
        identity: &IdentityId,
    ) -> Result<bool, RepositoryError>;

    /// Compare-and-delete: remove the room only if its participant set is
    /// empty at the instant of deletion. Returns whether a room was deleted.
    async fn delete_if_empty(&self, room_id: &RoomId) -> Result<bool, RepositoryError>;

    /// All rooms with at least one participant, newest first.
    async fn list_all(&self) -> Result<Vec<Room>, RepositoryError>;

    /// Rooms `identity` participates in, newest first.
    async fn list_by_participant(
        &self,
        identity: &IdentityId,
    ) -> Result<Vec<Room>, RepositoryError>;
}

/// Durable append-only storage of chat messages
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn append(&self, message: ChatMessage) -> Result<(), RepositoryError>;

    /// Up to `limit` messages of the room strictly before `cursor`
    /// (or the newest ones when `cursor` is `None`), newest first.
    async fn find_before(
        &self,
        room_id: &RoomId,
        cursor: Option<MessageCursor>,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// Whether any message of the room lies strictly before `cursor`.
    async fn exists_before(
        &self,
        room_id: &RoomId,
        cursor: MessageCursor,
    ) -> Result<bool, RepositoryError>;

    /// Delete every message of the room and return how many were removed.
    async fn delete_by_room(&self, room_id: &RoomId) -> Result<usize, RepositoryError>;
}
