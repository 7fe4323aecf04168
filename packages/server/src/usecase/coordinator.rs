//! Room Membership Coordinator
//!
//! 部屋・参加者・メッセージの整合性を保つ唯一の窓口です。
//! HTTP と WebSocket のどちらの入口から来た操作も、ここを経由して
//! Room Repository と Message Log を更新します。
//!
//! - 参加者の追加・削除は Repository の条件付き更新 1 回で完結させる
//! - 部屋の削除は「参加者 0 人なら削除」の条件付き削除で行う
//! - 状態が変わったら DomainEvent を発行し、配信グループの更新は UI 層に任せる

use std::sync::Arc;

use hiroba_shared::time::now_millis;

use crate::domain::{
    ChatMessage, DEFAULT_PARTICIPANT_CAPACITY, DomainEvent, EventPublisher, HistoryLimit,
    IdentityId, MessageContent, MessageCursor, MessageIdFactory, MessageRepository, Room,
    RoomId, RoomIdFactory, RoomRepository, RoomSummary, RoomTitle, Timestamp,
};

use super::error::CoordinatorError;

/// Result of `delete_room_and_messages`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomDeletion {
    /// false when the room was already gone or someone rejoined first
    pub deleted: bool,
    pub deleted_message_count: usize,
}

/// One page of a room's Message Log, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePage {
    pub messages: Vec<ChatMessage>,
    /// Whether entries strictly older than `next_cursor` exist
    pub has_more: bool,
    /// Position of the oldest returned entry; `None` for an empty page
    pub next_cursor: Option<MessageCursor>,
}

pub struct RoomMembershipCoordinator {
    rooms: Arc<dyn RoomRepository>,
    messages: Arc<dyn MessageRepository>,
    events: Arc<dyn EventPublisher>,
    participant_capacity: usize,
}

impl RoomMembershipCoordinator {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        messages: Arc<dyn MessageRepository>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            rooms,
            messages,
            events,
            participant_capacity: DEFAULT_PARTICIPANT_CAPACITY,
        }
    }

    /// Capacity applied to rooms created from now on
    pub fn with_participant_capacity(mut self, participant_capacity: usize) -> Self {
        self.participant_capacity = participant_capacity;
        self
    }

    /// Create a room whose participant set is exactly `{creator}`.
    pub async fn create_room(
        &self,
        creator: &IdentityId,
        title: RoomTitle,
    ) -> Result<Room, CoordinatorError> {
        let room = Room::with_capacity(
            RoomIdFactory::generate(),
            title,
            creator.clone(),
            Timestamp::new(now_millis()),
            self.participant_capacity,
        );
        self.rooms.insert(room.clone()).await?;

        tracing::info!(room_id = %room.id, creator = %creator, "Room created");
        self.events.publish(DomainEvent::RoomCreated {
            room_id: room.id.clone(),
            creator: creator.clone(),
        });
        Ok(room)
    }

    /// Add `identity` to the room.
    ///
    /// Returns `Ok(false)` when it was already a participant; no event is
    /// published in that case.
    pub async fn add_participant(
        &self,
        room_id: &RoomId,
        identity: &IdentityId,
    ) -> Result<bool, CoordinatorError> {
        let added = self.rooms.add_participant(room_id, identity).await?;
        if added {
            tracing::info!(room_id = %room_id, identity = %identity, "Participant added");
            self.events.publish(DomainEvent::ParticipantAdded {
                room_id: room_id.clone(),
                identity: identity.clone(),
            });
        }
        Ok(added)
    }

    pub async fn is_participant(
        &self,
        room_id: &RoomId,
        identity: &IdentityId,
    ) -> Result<bool, CoordinatorError> {
        Ok(self.rooms.is_participant(room_id, identity).await?)
    }

    /// Remove `identity` from the room and return how many participants remain.
    ///
    /// The room itself is left in place even at zero; call
    /// `delete_room_and_messages` afterwards.
    pub async fn remove_participant(
        &self,
        room_id: &RoomId,
        identity: &IdentityId,
    ) -> Result<usize, CoordinatorError> {
        let remaining = self.rooms.remove_participant(room_id, identity).await?;

        tracing::info!(room_id = %room_id, identity = %identity, remaining, "Participant removed");
        self.events.publish(DomainEvent::ParticipantRemoved {
            room_id: room_id.clone(),
            identity: identity.clone(),
            remaining,
        });
        Ok(remaining)
    }

    /// Delete the room if (and only if) it has no participants, then purge
    /// its Message Log.
    pub async fn delete_room_and_messages(
        &self,
        room_id: &RoomId,
    ) -> Result<RoomDeletion, CoordinatorError> {
        if !self.rooms.delete_if_empty(room_id).await? {
            tracing::debug!(room_id = %room_id, "Room not deleted: gone or occupied");
            return Ok(RoomDeletion {
                deleted: false,
                deleted_message_count: 0,
            });
        }

        let deleted_message_count = self.messages.delete_by_room(room_id).await.map_err(|e| {
            tracing::error!(room_id = %room_id, error = %e, "Room deleted but its messages were not");
            CoordinatorError::from(e)
        })?;

        tracing::info!(room_id = %room_id, deleted_message_count, "Room deleted");
        self.events.publish(DomainEvent::RoomDeleted {
            room_id: room_id.clone(),
            deleted_message_count,
        });
        Ok(RoomDeletion {
            deleted: true,
            deleted_message_count,
        })
    }

    pub async fn find_room(&self, room_id: &RoomId) -> Result<Room, CoordinatorError> {
        self.rooms
            .find_by_id(room_id)
            .await?
            .ok_or_else(|| CoordinatorError::RoomNotFound(room_id.to_string()))
    }

    /// Rooms `identity` participates in, newest first
    pub async fn list_rooms_for_identity(
        &self,
        identity: &IdentityId,
    ) -> Result<Vec<RoomSummary>, CoordinatorError> {
        let rooms = self.rooms.list_by_participant(identity).await?;
        Ok(rooms
            .iter()
            .map(|room| room.summarize(Some(identity)))
            .collect())
    }

    /// Every non-empty room, newest first, flagged with `viewer`'s membership
    pub async fn list_all_rooms(
        &self,
        viewer: Option<&IdentityId>,
    ) -> Result<Vec<RoomSummary>, CoordinatorError> {
        let rooms = self.rooms.list_all().await?;
        Ok(rooms.iter().map(|room| room.summarize(viewer)).collect())
    }

    /// Append a message to the room's log.
    ///
    /// # Errors
    ///
    /// * `Forbidden` - `author` is not a participant (nothing is stored)
    /// * `InvalidContent` - empty after trimming or longer than 200 characters
    /// * `RoomNotFound` - the room was deleted while the message was stored
    pub async fn send_message(
        &self,
        room_id: &RoomId,
        author: &IdentityId,
        content: String,
    ) -> Result<ChatMessage, CoordinatorError> {
        if !self.rooms.is_participant(room_id, author).await? {
            tracing::warn!(room_id = %room_id, author = %author, "Rejected message from non-participant");
            return Err(CoordinatorError::Forbidden(format!(
                "{author} is not a participant of room {room_id}"
            )));
        }
        let content = MessageContent::new(content)?;

        let message = ChatMessage::new(
            MessageIdFactory::generate(),
            room_id.clone(),
            author.clone(),
            content,
            Timestamp::new(now_millis()),
        );
        self.messages.append(message.clone()).await?;

        // The last participant may have left between the check and the append.
        if self.rooms.find_by_id(room_id).await?.is_none() {
            let purged = self.messages.delete_by_room(room_id).await?;
            tracing::warn!(room_id = %room_id, purged, "Room vanished during send; purged orphaned messages");
            return Err(CoordinatorError::RoomNotFound(room_id.to_string()));
        }

        tracing::debug!(room_id = %room_id, message_id = %message.id, "Message stored");
        Ok(message)
    }

    /// Newest-first page of the room's log strictly older than `cursor`.
    pub async fn list_messages(
        &self,
        room_id: &RoomId,
        limit: HistoryLimit,
        cursor: Option<MessageCursor>,
    ) -> Result<MessagePage, CoordinatorError> {
        let messages = self
            .messages
            .find_before(room_id, cursor, limit.value())
            .await?;
        let next_cursor = messages
            .last()
            .map(|oldest| MessageCursor::at_message(oldest.created_at, oldest.id));
        let has_more = match next_cursor {
            Some(cursor) => self.messages.exists_before(room_id, cursor).await?,
            None => false,
        };
        Ok(MessagePage {
            messages,
            has_more,
            next_cursor,
        })
    }
}
