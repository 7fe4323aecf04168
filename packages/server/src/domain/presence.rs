//! Presence Registry port.

use async_trait::async_trait;

use super::value_object::{ConnectionId, IdentityId};

/// Ephemeral identity <-> live connection mapping.
///
/// Implementations make `bind` and `unbind` atomic with respect to each other
/// (a single lock, or a single-threaded key-value store). Absence is `None`,
/// never an error.
#[async_trait]
pub trait PresenceRegistry: Send + Sync {
    /// Bind `connection` as the current connection of `identity`.
    ///
    /// Returns the connection that was bound immediately before, if it
    /// differs from `connection`, so the caller can terminate it.
    async fn bind(&self, identity: &IdentityId, connection: ConnectionId) -> Option<ConnectionId>;

    /// Forget `connection`. The identity's binding is cleared only while it
    /// still points at this exact connection.
    async fn unbind(&self, connection: ConnectionId);

    async fn lookup(&self, identity: &IdentityId) -> Option<ConnectionId>;
}
