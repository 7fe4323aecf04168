//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use hiroba_shared::time::rfc3339_to_timestamp;

use super::error::ValueObjectError;

/// Maximum length of an identity reference
pub const IDENTITY_ID_MAX_LENGTH: usize = 100;

/// Maximum length of a room title (in characters, after trimming)
pub const ROOM_TITLE_MAX_LENGTH: usize = 50;

/// Maximum length of a message body (in characters, after trimming)
pub const MESSAGE_CONTENT_MAX_LENGTH: usize = 200;

/// Identity value object.
///
/// A stable, opaque reference to a registered user (a "profile" id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentityId(String);

impl IdentityId {
    /// Create a new IdentityId.
    ///
    /// # Arguments
    ///
    /// * `id` - The profile identifier string
    ///
    /// # Returns
    ///
    /// A Result containing the IdentityId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::IdentityIdEmpty);
        }
        let len = id.chars().count();
        if len > IDENTITY_ID_MAX_LENGTH {
            return Err(ValueObjectError::IdentityIdTooLong {
                max: IDENTITY_ID_MAX_LENGTH,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for IdentityId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IdentityId> for String {
    fn from(value: IdentityId) -> Self {
        value.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identifier value object.
///
/// Represents a unique identifier for a chat room (UUID string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

impl RoomId {
    /// Create a new RoomId from its string form.
    ///
    /// The value must parse as a UUID. It is stored in the canonical
    /// lowercase hyphenated form.
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::RoomIdEmpty);
        }
        let uuid = Uuid::parse_str(&id).map_err(|_| ValueObjectError::RoomIdInvalidFormat(id))?;
        Ok(Self(uuid.hyphenated().to_string()))
    }

    /// Create a RoomId from an already generated UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.hyphenated().to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoomId> for String {
    fn from(value: RoomId) -> Self {
        value.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room title value object.
///
/// Stored trimmed; must be non-empty and at most 50 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomTitle(String);

impl RoomTitle {
    pub fn new(title: String) -> Result<Self, ValueObjectError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::RoomTitleEmpty);
        }
        let len = trimmed.chars().count();
        if len > ROOM_TITLE_MAX_LENGTH {
            return Err(ValueObjectError::RoomTitleTooLong {
                max: ROOM_TITLE_MAX_LENGTH,
                actual: len,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomTitle {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoomTitle> for String {
    fn from(value: RoomTitle) -> Self {
        value.0
    }
}

impl fmt::Display for RoomTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message content value object.
///
/// Represents the content of a chat message with validation. Surrounding
/// whitespace is trimmed before the length checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageContent(String);

impl MessageContent {
    /// Create a new MessageContent.
    ///
    /// # Arguments
    ///
    /// * `content` - The message content string
    ///
    /// # Returns
    ///
    /// A Result containing the MessageContent or an error if validation fails
    pub fn new(content: String) -> Result<Self, ValueObjectError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::MessageContentEmpty);
        }
        let len = trimmed.chars().count();
        if len > MESSAGE_CONTENT_MAX_LENGTH {
            return Err(ValueObjectError::MessageContentTooLong {
                max: MESSAGE_CONTENT_MAX_LENGTH,
                actual: len,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MessageContent> for String {
    fn from(value: MessageContent) -> Self {
        value.0
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message identifier value object.
///
/// A UUID v7, so ids sort in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn parse(value: &str) -> Result<Self, ValueObjectError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| ValueObjectError::MessageIdInvalidFormat(value.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Live connection handle.
///
/// Identifies one WebSocket connection for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Creation time of rooms and messages: Unix milliseconds, UTC.
///
/// Rendered as RFC 3339 on the wire (see `hiroba_shared::time`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pagination marker: "strictly older than this point".
///
/// With only a timestamp, entries with `created_at < before` qualify. When the
/// message id of the previous page's oldest entry is also known, the
/// comparison is on `(created_at, message_id)`, which keeps pages exact when
/// several messages share a millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCursor {
    pub before: Timestamp,
    pub before_id: Option<MessageId>,
}

impl MessageCursor {
    pub fn at(before: Timestamp) -> Self {
        Self {
            before,
            before_id: None,
        }
    }

    pub fn at_message(before: Timestamp, before_id: MessageId) -> Self {
        Self {
            before,
            before_id: Some(before_id),
        }
    }

    /// Parse a cursor from its wire form: an RFC 3339 timestamp and an optional message id.
    pub fn parse(before: &str, before_id: Option<&str>) -> Result<Self, ValueObjectError> {
        let millis = rfc3339_to_timestamp(before)
            .ok_or_else(|| ValueObjectError::CursorInvalidFormat(before.to_string()))?;
        let before = Timestamp::new(millis);
        match before_id {
            Some(id) => Ok(Self::at_message(before, MessageId::parse(id)?)),
            None => Ok(Self::at(before)),
        }
    }

    /// Whether an entry at `(created_at, id)` lies strictly before this cursor.
    pub fn admits(&self, created_at: Timestamp, id: MessageId) -> bool {
        match self.before_id {
            Some(before_id) => (created_at, id) < (self.before, before_id),
            None => created_at < self.before,
        }
    }
}

/// Page size of a history request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimit(usize);

impl HistoryLimit {
    pub const DEFAULT: usize = 50;
    pub const MIN: usize = 1;
    pub const MAX: usize = 200;

    pub fn new(limit: usize) -> Result<Self, ValueObjectError> {
        if !(Self::MIN..=Self::MAX).contains(&limit) {
            return Err(ValueObjectError::HistoryLimitOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: limit,
            });
        }
        Ok(Self(limit))
    }

    /// `None` falls back to the default page size
    pub fn from_request(limit: Option<usize>) -> Result<Self, ValueObjectError> {
        Self::new(limit.unwrap_or(Self::DEFAULT))
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl Default for HistoryLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}
