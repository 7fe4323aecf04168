//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// IdentityId validation error
    #[error("IdentityId cannot be empty")]
    IdentityIdEmpty,

    /// IdentityId too long error
    #[error("IdentityId cannot exceed {max} characters (got {actual})")]
    IdentityIdTooLong { max: usize, actual: usize },

    /// RoomId validation error
    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    /// RoomId invalid format error (not a valid UUID format)
    #[error("RoomId must be a valid UUID format (got: {0})")]
    RoomIdInvalidFormat(String),

    /// RoomTitle validation error
    #[error("RoomTitle cannot be empty")]
    RoomTitleEmpty,

    /// RoomTitle too long error
    #[error("RoomTitle cannot exceed {max} characters (got {actual})")]
    RoomTitleTooLong { max: usize, actual: usize },

    /// MessageContent validation error
    #[error("MessageContent cannot be empty")]
    MessageContentEmpty,

    /// MessageContent too long error
    #[error("MessageContent cannot exceed {max} characters (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },

    /// MessageId invalid format error
    #[error("MessageId must be a valid UUID format (got: {0})")]
    MessageIdInvalidFormat(String),

    /// History page size out of range
    #[error("History limit must be between {min} and {max} (got {actual})")]
    HistoryLimitOutOfRange {
        min: usize,
        max: usize,
        actual: usize,
    },

    /// Cursor timestamp is not RFC 3339
    #[error("Cursor must be an RFC 3339 timestamp (got: {0})")]
    CursorInvalidFormat(String),
}

/// Errors related to Room domain logic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// Room capacity exceeded error
    #[error("Room capacity exceeded: maximum {capacity} participants allowed (current: {current})")]
    CapacityExceeded { capacity: usize, current: usize },
}

/// Errors raised by storage ports (Room Repository, Message Log, Identity Store)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("Participant '{identity}' not found in room {room_id}")]
    ParticipantNotFound { room_id: String, identity: String },

    #[error("Room already exists: {0}")]
    RoomAlreadyExists(String),

    #[error(transparent)]
    Room(#[from] RoomError),

    /// Connectivity or engine failure; never retried by the core
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Token Service failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing credential")]
    MissingCredential,

    #[error("Invalid or expired token: {0}")]
    InvalidToken(String),

    #[error("Token subject is not a valid identity: {0}")]
    InvalidSubject(#[from] ValueObjectError),

    #[error("Token signing failed: {0}")]
    Signing(String),
}
