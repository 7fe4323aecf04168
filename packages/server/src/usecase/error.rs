//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{RepositoryError, RoomError, ValueObjectError};

/// Errors returned by the Room Membership Coordinator and the flows built on it
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    /// The room does not exist (or was deleted)
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    /// The identity is not a participant of the room
    #[error("Not a participant: {0}")]
    NotFound(String),

    /// The caller may not act on the room
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Input failed validation (content, title, limit, cursor, ids)
    #[error("Invalid input: {0}")]
    InvalidContent(#[from] ValueObjectError),

    /// The caller could not be verified against the identity store
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Room is full: maximum {capacity} participants")]
    RoomFull { capacity: usize },

    /// Storage or other infrastructure failure
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl CoordinatorError {
    /// Stable, machine-readable error code sent to clients
    pub fn code(&self) -> &'static str {
        match self {
            CoordinatorError::RoomNotFound(_) => "ROOM_NOT_FOUND",
            CoordinatorError::NotFound(_) => "NOT_A_PARTICIPANT",
            CoordinatorError::Forbidden(_) => "FORBIDDEN",
            CoordinatorError::InvalidContent(_) => "INVALID_CONTENT",
            CoordinatorError::Unauthorized(_) => "UNAUTHORIZED",
            CoordinatorError::RoomFull { .. } => "ROOM_FULL",
            CoordinatorError::Infrastructure(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<RepositoryError> for CoordinatorError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::RoomNotFound(room_id) => CoordinatorError::RoomNotFound(room_id),
            RepositoryError::ParticipantNotFound { room_id, identity } => {
                CoordinatorError::NotFound(format!("{identity} in room {room_id}"))
            }
            RepositoryError::Room(RoomError::CapacityExceeded { capacity, .. }) => {
                CoordinatorError::RoomFull { capacity }
            }
            other @ (RepositoryError::RoomAlreadyExists(_) | RepositoryError::Unavailable(_)) => {
                CoordinatorError::Infrastructure(other.to_string())
            }
        }
    }
}

/// Errors of the connection setup flow
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("Failed to load room memberships: {0}")]
    Membership(#[from] CoordinatorError),
}
