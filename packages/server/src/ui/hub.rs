//! Connection hub: live WebSocket connections and their broadcast groups.
//!
//! 各接続は自分の ID の個人グループ（Personal）と、参加中の部屋のグループ（Room）に
//! 所属します。部屋への配信はグループ単位で行い、JSON へのシリアライズは 1 回だけです。

use std::collections::{HashMap, HashSet};

use tokio::sync::{RwLock, mpsc};

use crate::{
    domain::{ConnectionId, IdentityId, RoomId},
    infrastructure::dto::websocket::ServerEvent,
};

/// Frames queued for a single connection's writer task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Serialized JSON frame
    Frame(String),
    /// Close the socket with this reason
    Close(String),
}

pub type ConnectionSender = mpsc::UnboundedSender<Outbound>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Room(RoomId),
    Personal(IdentityId),
}

struct ConnectionEntry {
    identity: IdentityId,
    sender: ConnectionSender,
}

#[derive(Default)]
struct Inner {
    connections: HashMap<ConnectionId, ConnectionEntry>,
    groups: HashMap<GroupKey, HashSet<ConnectionId>>,
}

impl Inner {
    fn join(&mut self, key: GroupKey, connection: ConnectionId) {
        self.groups.entry(key).or_default().insert(connection);
    }

    fn leave(&mut self, key: &GroupKey, connection: ConnectionId) {
        if let Some(members) = self.groups.get_mut(key) {
            members.remove(&connection);
            if members.is_empty() {
                self.groups.remove(key);
            }
        }
    }

    fn members(&self, key: &GroupKey) -> Vec<ConnectionId> {
        self.groups
            .get(key)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    fn deliver(&self, targets: &[ConnectionId], outbound: &Outbound) -> usize {
        let mut delivered = 0;
        for connection in targets {
            let Some(entry) = self.connections.get(connection) else {
                continue;
            };
            if entry.sender.send(outbound.clone()).is_err() {
                tracing::warn!(connection = %connection, "Failed to queue frame; writer is gone");
            } else {
                delivered += 1;
            }
        }
        delivered
    }
}

fn encode(event: &ServerEvent) -> Option<Outbound> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Outbound::Frame(json)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize server event");
            None
        }
    }
}

#[derive(Default)]
pub struct ConnectionHub {
    inner: RwLock<Inner>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and put it in its identity's personal group
    pub async fn register(
        &self,
        connection: ConnectionId,
        identity: IdentityId,
        sender: ConnectionSender,
    ) {
        let mut inner = self.inner.write().await;
        inner.join(GroupKey::Personal(identity.clone()), connection);
        inner
            .connections
            .insert(connection, ConnectionEntry { identity, sender });
    }

    /// Drop a connection from every group it belongs to
    pub async fn unregister(&self, connection: ConnectionId) {
        let mut inner = self.inner.write().await;
        inner.connections.remove(&connection);
        inner.groups.retain(|_, members| {
            members.remove(&connection);
            !members.is_empty()
        });
    }

    pub async fn subscribe(&self, connection: ConnectionId, room_id: &RoomId) {
        let mut inner = self.inner.write().await;
        if inner.connections.contains_key(&connection) {
            inner.join(GroupKey::Room(room_id.clone()), connection);
        }
    }

    pub async fn unsubscribe(&self, connection: ConnectionId, room_id: &RoomId) {
        let mut inner = self.inner.write().await;
        inner.leave(&GroupKey::Room(room_id.clone()), connection);
    }

    /// Subscribe every live connection of `identity` to the room.
    pub async fn subscribe_identity(&self, identity: &IdentityId, room_id: &RoomId) -> usize {
        let mut inner = self.inner.write().await;
        let connections = inner.members(&GroupKey::Personal(identity.clone()));
        for connection in &connections {
            inner.join(GroupKey::Room(room_id.clone()), *connection);
        }
        connections.len()
    }

    pub async fn unsubscribe_identity(&self, identity: &IdentityId, room_id: &RoomId) {
        let mut inner = self.inner.write().await;
        let key = GroupKey::Room(room_id.clone());
        for connection in inner.members(&GroupKey::Personal(identity.clone())) {
            inner.leave(&key, connection);
        }
    }

    pub async fn drop_room(&self, room_id: &RoomId) {
        let mut inner = self.inner.write().await;
        inner.groups.remove(&GroupKey::Room(room_id.clone()));
    }

    /// Send to every connection subscribed to the room. Returns how many were queued.
    pub async fn broadcast_to_room(&self, room_id: &RoomId, event: &ServerEvent) -> usize {
        let Some(outbound) = encode(event) else {
            return 0;
        };
        let inner = self.inner.read().await;
        let targets = inner.members(&GroupKey::Room(room_id.clone()));
        inner.deliver(&targets, &outbound)
    }

    pub async fn send_to_connection(&self, connection: ConnectionId, event: &ServerEvent) -> bool {
        let Some(outbound) = encode(event) else {
            return false;
        };
        let inner = self.inner.read().await;
        inner.deliver(&[connection], &outbound) == 1
    }

    /// Queue `event` followed by a close frame for this connection.
    pub async fn close(&self, connection: ConnectionId, event: &ServerEvent, reason: &str) {
        let inner = self.inner.read().await;
        if let Some(outbound) = encode(event) {
            inner.deliver(&[connection], &outbound);
        }
        inner.deliver(&[connection], &Outbound::Close(reason.to_string()));
    }

    pub async fn is_online(&self, identity: &IdentityId) -> bool {
        let inner = self.inner.read().await;
        inner
            .groups
            .contains_key(&GroupKey::Personal(identity.clone()))
    }

    pub async fn identity_of(&self, connection: ConnectionId) -> Option<IdentityId> {
        let inner = self.inner.read().await;
        inner
            .connections
            .get(&connection)
            .map(|entry| entry.identity.clone())
    }

    pub async fn room_subscribers(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        let inner = self.inner.read().await;
        inner.members(&GroupKey::Room(room_id.clone()))
    }
}
