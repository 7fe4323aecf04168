//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    domain::{HistoryLimit, IdentityId, MessageCursor, RoomId},
    infrastructure::dto::{
        http::{
            CreateRoomRequest, HistoryQuery, JoinRoomResponse, LeaveRoomResponse, MemberDto,
            RoomDto, RoomMembersDto, RoomSummaryDto, TokenRequest, TokenResponse,
        },
        websocket::HistoryPageDto,
    },
    ui::{auth::AuthenticatedIdentity, error::ApiError, state::AppState},
    usecase::CoordinatorError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Issue an access token for a known identity (development only)
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let identity = IdentityId::new(request.profile_id)?;
    let known = state
        .identities
        .exists(&identity)
        .await
        .map_err(|e| CoordinatorError::Infrastructure(e.to_string()))?;
    if !known {
        return Err(ApiError::not_found(format!("unknown identity: {identity}")));
    }
    let token = state.tokens.sign(&identity)?;
    tracing::info!(identity = %identity, "Issued development token");
    Ok(Json(TokenResponse::new(token, &identity)))
}

pub async fn create_room(
    State(state): State<Arc<AppState>>,
    AuthenticatedIdentity(identity): AuthenticatedIdentity,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomDto>), ApiError> {
    let room = state.create_room().execute(&identity, request.title).await?;
    Ok((StatusCode::CREATED, Json(RoomDto::from(&room))))
}

/// Every room, flagged with the caller's membership
pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
    AuthenticatedIdentity(identity): AuthenticatedIdentity,
) -> Result<Json<Vec<RoomSummaryDto>>, ApiError> {
    let rooms = state.coordinator.list_all_rooms(Some(&identity)).await?;
    Ok(Json(rooms.iter().map(RoomSummaryDto::from).collect()))
}

/// Rooms the caller participates in
pub async fn list_my_rooms(
    State(state): State<Arc<AppState>>,
    AuthenticatedIdentity(identity): AuthenticatedIdentity,
) -> Result<Json<Vec<RoomSummaryDto>>, ApiError> {
    let rooms = state.coordinator.list_rooms_for_identity(&identity).await?;
    Ok(Json(rooms.iter().map(RoomSummaryDto::from).collect()))
}

pub async fn join_room(
    State(state): State<Arc<AppState>>,
    AuthenticatedIdentity(identity): AuthenticatedIdentity,
    Path(room_id): Path<String>,
) -> Result<Json<JoinRoomResponse>, ApiError> {
    let room_id = RoomId::new(room_id)?;
    let outcome = state.join_room().execute(&identity, &room_id).await?;
    Ok(Json(JoinRoomResponse::from(&outcome)))
}

pub async fn leave_room(
    State(state): State<Arc<AppState>>,
    AuthenticatedIdentity(identity): AuthenticatedIdentity,
    Path(room_id): Path<String>,
) -> Result<Json<LeaveRoomResponse>, ApiError> {
    let room_id = RoomId::new(room_id)?;
    let outcome = state.leave_room().execute(&identity, &room_id).await?;
    Ok(Json(LeaveRoomResponse::from(&outcome)))
}

/// Newest-first page of a room's messages
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    AuthenticatedIdentity(identity): AuthenticatedIdentity,
    Path(room_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryPageDto>, ApiError> {
    let room_id = RoomId::new(room_id)?;
    let limit = HistoryLimit::from_request(query.limit)?;
    let cursor = query
        .cursor
        .as_deref()
        .map(|cursor| MessageCursor::parse(cursor, query.cursor_id.as_deref()))
        .transpose()?;

    let page = state
        .fetch_history()
        .execute(&identity, &room_id, limit, cursor)
        .await?;
    Ok(Json(HistoryPageDto::from(&page)))
}

/// Participants of a room and whether each has a live connection
pub async fn list_members(
    State(state): State<Arc<AppState>>,
    AuthenticatedIdentity(_identity): AuthenticatedIdentity,
    Path(room_id): Path<String>,
) -> Result<Json<RoomMembersDto>, ApiError> {
    let room_id = RoomId::new(room_id)?;
    let room = state.coordinator.find_room(&room_id).await?;

    let mut members = Vec::with_capacity(room.participant_count());
    for participant in &room.participants {
        members.push(MemberDto {
            profile_id: participant.to_string(),
            online: state.hub.is_online(participant).await,
        });
    }

    Ok(Json(RoomMembersDto {
        room_id: room_id.to_string(),
        members,
    }))
}
