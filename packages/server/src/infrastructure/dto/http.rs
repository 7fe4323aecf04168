//! HTTP API request/response DTOs for the chat application.

use serde::{Deserialize, Serialize};

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::{IdentityId, Room, RoomSummary},
    usecase::{JoinOutcome, LeaveOutcome},
};

/// Create-room request body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub title: String,
}

/// Freshly created room
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub room_id: String,
    pub title: String,
    pub created_at: String, // ISO 8601
    pub participants: Vec<String>,
}

impl From<&Room> for RoomDto {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.id.to_string(),
            title: room.title.to_string(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
            participants: room.participants.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Room summary for list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub room_id: String,
    pub title: String,
    pub created_at: String, // ISO 8601
    pub participant_count: usize,
    pub participants: Vec<String>,
    pub is_member: bool,
}

impl From<&RoomSummary> for RoomSummaryDto {
    fn from(summary: &RoomSummary) -> Self {
        Self {
            room_id: summary.room_id.to_string(),
            title: summary.title.to_string(),
            created_at: timestamp_to_rfc3339(summary.created_at.value()),
            participant_count: summary.participant_count,
            participants: summary.participants.iter().map(ToString::to_string).collect(),
            is_member: summary.is_member,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomResponse {
    pub room_id: String,
    pub already_participant: bool,
}

impl From<&JoinOutcome> for JoinRoomResponse {
    fn from(outcome: &JoinOutcome) -> Self {
        Self {
            room_id: outcome.room_id.to_string(),
            already_participant: outcome.already_participant,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRoomResponse {
    pub room_id: String,
    pub remaining_participants: usize,
    pub room_deleted: bool,
    pub deleted_message_count: usize,
}

impl From<&LeaveOutcome> for LeaveRoomResponse {
    fn from(outcome: &LeaveOutcome) -> Self {
        Self {
            room_id: outcome.room_id.to_string(),
            remaining_participants: outcome.remaining_participants,
            room_deleted: outcome.room_deleted,
            deleted_message_count: outcome.deleted_message_count,
        }
    }
}

/// Query string of the history endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
    pub cursor: Option<String>,
    pub cursor_id: Option<String>,
}

/// Room member with live-connection status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    pub profile_id: String,
    pub online: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMembersDto {
    pub room_id: String,
    pub members: Vec<MemberDto>,
}

/// Development token request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub profile_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub profile_id: String,
}

impl TokenResponse {
    pub fn new(access_token: String, identity: &IdentityId) -> Self {
        Self {
            access_token,
            profile_id: identity.to_string(),
        }
    }
}
