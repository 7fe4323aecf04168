//! WebSocket message DTOs for the chat application.
//!
//! Every frame is a JSON object whose `type` field names the event. Field
//! names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::{ChatMessage, ConnectionId, IdentityId, MessageCursor, RoomId},
    usecase::{HistoryPage, JoinOutcome, LeaveOutcome},
};

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    #[serde(rename = "room.join", alias = "joinRoom")]
    JoinRoom { room_id: String },

    #[serde(rename = "room.leave", alias = "leaveRoom")]
    LeaveRoom { room_id: String },

    #[serde(rename = "message.send", alias = "sendMessage")]
    SendMessage { room_id: String, content: String },

    #[serde(rename = "message/history")]
    FetchHistory {
        room_id: String,
        /// RFC 3339 timestamp, "strictly older than"
        #[serde(default)]
        cursor: Option<String>,
        #[serde(default)]
        cursor_id: Option<String>,
        #[serde(default)]
        limit: Option<usize>,
    },

    #[serde(rename = "ping")]
    Ping {
        #[serde(default)]
        echo: serde_json::Value,
    },
}

/// Membership change kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MembershipChange {
    Joined,
    Left,
}

/// Events sent by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Connection accepted; lists the rooms the connection was subscribed to
    #[serde(rename = "socket/registered")]
    Registered {
        connection_id: String,
        profile_id: String,
        room_ids: Vec<String>,
    },

    #[serde(rename = "room.joined")]
    RoomJoined {
        room_id: String,
        already_participant: bool,
    },

    #[serde(rename = "room.left")]
    RoomLeft {
        room_id: String,
        remaining_participants: usize,
        room_deleted: bool,
    },

    #[serde(rename = "room.membership-changed")]
    MembershipChanged {
        room_id: String,
        profile_id: String,
        change: MembershipChange,
    },

    #[serde(rename = "message:new")]
    NewMessage { message: MessageDto },

    #[serde(rename = "message/history")]
    History(HistoryPageDto),

    /// Sent to a connection right before it is closed in favour of a newer one
    #[serde(rename = "session.superseded")]
    SessionSuperseded { reason: String },

    #[serde(rename = "pong")]
    Pong { at: i64, echo: serde_json::Value },

    #[serde(rename = "error")]
    Error { code: String, message: String },
}

impl ServerEvent {
    pub fn registered(connection: ConnectionId, identity: &IdentityId, rooms: &[RoomId]) -> Self {
        ServerEvent::Registered {
            connection_id: connection.to_string(),
            profile_id: identity.to_string(),
            room_ids: rooms.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        ServerEvent::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn membership_changed(room_id: &RoomId, identity: &IdentityId, change: MembershipChange) -> Self {
        ServerEvent::MembershipChanged {
            room_id: room_id.to_string(),
            profile_id: identity.to_string(),
            change,
        }
    }
}

impl From<&JoinOutcome> for ServerEvent {
    fn from(outcome: &JoinOutcome) -> Self {
        ServerEvent::RoomJoined {
            room_id: outcome.room_id.to_string(),
            already_participant: outcome.already_participant,
        }
    }
}

impl From<&LeaveOutcome> for ServerEvent {
    fn from(outcome: &LeaveOutcome) -> Self {
        ServerEvent::RoomLeft {
            room_id: outcome.room_id.to_string(),
            remaining_participants: outcome.remaining_participants,
            room_deleted: outcome.room_deleted,
        }
    }
}

/// A chat message as delivered to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub message_id: String,
    pub room_id: String,
    pub profile_id: String,
    pub user_name: Option<String>,
    pub content: String,
    /// RFC 3339 (UTC, milliseconds)
    pub created_at: String,
}

impl MessageDto {
    pub fn from_message(message: &ChatMessage, user_name: Option<String>) -> Self {
        Self {
            message_id: message.id.to_string(),
            room_id: message.room_id.to_string(),
            profile_id: message.author.to_string(),
            user_name,
            content: message.content.as_str().to_string(),
            created_at: timestamp_to_rfc3339(message.created_at.value()),
        }
    }
}

/// One page of room history, newest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPageDto {
    pub room_id: String,
    pub messages: Vec<MessageDto>,
    pub next_cursor: Option<String>,
    pub next_cursor_id: Option<String>,
    pub has_more: bool,
}

impl From<&HistoryPage> for HistoryPageDto {
    fn from(page: &HistoryPage) -> Self {
        let (next_cursor, next_cursor_id) = match page.next_cursor {
            Some(MessageCursor { before, before_id }) => (
                Some(timestamp_to_rfc3339(before.value())),
                before_id.map(|id| id.to_string()),
            ),
            None => (None, None),
        };
        Self {
            room_id: page.room_id.to_string(),
            messages: page
                .entries
                .iter()
                .map(|entry| MessageDto::from_message(&entry.message, entry.author_name.clone()))
                .collect(),
            next_cursor,
            next_cursor_id,
            has_more: page.has_more,
        }
    }
}
