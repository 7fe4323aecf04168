//! Core domain models for the chat application.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{
    error::RoomError,
    value_object::{IdentityId, MessageContent, MessageId, RoomId, RoomTitle, Timestamp},
};

/// Default maximum number of participants allowed in a room
pub const DEFAULT_PARTICIPANT_CAPACITY: usize = 100;

/// Represents a chat room and its participant set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier
    pub id: RoomId,
    /// Room title
    pub title: RoomTitle,
    /// Timestamp when the room was created
    pub created_at: Timestamp,
    /// Identities currently participating in the room
    pub participants: BTreeSet<IdentityId>,
    /// Maximum number of participants allowed (default: 100)
    pub participant_capacity: usize,
}

impl Room {
    /// Create a new room whose only participant is its creator
    pub fn new(id: RoomId, title: RoomTitle, creator: IdentityId, created_at: Timestamp) -> Self {
        Self::with_capacity(id, title, creator, created_at, DEFAULT_PARTICIPANT_CAPACITY)
    }

    /// Create a new room with a custom participant capacity
    pub fn with_capacity(
        id: RoomId,
        title: RoomTitle,
        creator: IdentityId,
        created_at: Timestamp,
        participant_capacity: usize,
    ) -> Self {
        Self {
            id,
            title,
            created_at,
            participants: BTreeSet::from([creator]),
            participant_capacity,
        }
    }

    /// Add a participant to the room
    ///
    /// Returns `Ok(false)` when the identity is already a participant.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::CapacityExceeded` if the room is at full capacity
    pub fn add_participant(&mut self, identity: IdentityId) -> Result<bool, RoomError> {
        if self.participants.contains(&identity) {
            return Ok(false);
        }
        if self.participants.len() >= self.participant_capacity {
            return Err(RoomError::CapacityExceeded {
                capacity: self.participant_capacity,
                current: self.participants.len(),
            });
        }
        Ok(self.participants.insert(identity))
    }

    /// Remove a participant from the room. Returns whether it was present.
    pub fn remove_participant(&mut self, identity: &IdentityId) -> bool {
        self.participants.remove(identity)
    }

    pub fn is_participant(&self, identity: &IdentityId) -> bool {
        self.participants.contains(identity)
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Read-only projection of this room as seen by `viewer`
    pub fn summarize(&self, viewer: Option<&IdentityId>) -> RoomSummary {
        RoomSummary {
            room_id: self.id.clone(),
            title: self.title.clone(),
            created_at: self.created_at,
            participant_count: self.participants.len(),
            participants: self.participants.iter().cloned().collect(),
            is_member: viewer.is_some_and(|v| self.participants.contains(v)),
        }
    }
}

/// Room listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub title: RoomTitle,
    pub created_at: Timestamp,
    pub participant_count: usize,
    pub participants: Vec<IdentityId>,
    /// Whether the requesting identity is a participant
    pub is_member: bool,
}

/// Represents a chat message in the domain model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Time-ordered message identifier
    pub id: MessageId,
    /// Owning room
    pub room_id: RoomId,
    /// Author identity
    pub author: IdentityId,
    /// Message content
    pub content: MessageContent,
    /// Timestamp when the message was stored
    pub created_at: Timestamp,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(
        id: MessageId,
        room_id: RoomId,
        author: IdentityId,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            room_id,
            author,
            content,
            created_at,
        }
    }

    /// Sort key used by the Message Log: creation time, then id
    pub fn sort_key(&self) -> (Timestamp, MessageId) {
        (self.created_at, self.id)
    }
}
