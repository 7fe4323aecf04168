//! InMemory Presence Registry 実装
//!
//! identity -> connection と connection -> identity の 2 つの表を 1 つの Mutex で守り、
//! bind / unbind をそれぞれ原子的な操作にしています。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, IdentityId, PresenceRegistry};

#[derive(Default)]
struct Bindings {
    by_identity: HashMap<IdentityId, ConnectionId>,
    by_connection: HashMap<ConnectionId, IdentityId>,
}

/// インメモリ Presence Registry
#[derive(Default)]
pub struct InMemoryPresenceRegistry {
    bindings: Mutex<Bindings>,
}

impl InMemoryPresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresenceRegistry for InMemoryPresenceRegistry {
    async fn bind(&self, identity: &IdentityId, connection: ConnectionId) -> Option<ConnectionId> {
        let mut bindings = self.bindings.lock().await;
        let previous = bindings.by_identity.insert(identity.clone(), connection);
        bindings.by_connection.insert(connection, identity.clone());
        previous.filter(|prev| *prev != connection)
    }

    async fn unbind(&self, connection: ConnectionId) {
        let mut bindings = self.bindings.lock().await;
        let Some(identity) = bindings.by_connection.remove(&connection) else {
            return;
        };
        // 既に新しい接続に置き換わっている場合は触らない
        if bindings.by_identity.get(&identity) == Some(&connection) {
            bindings.by_identity.remove(&identity);
        }
    }

    async fn lookup(&self, identity: &IdentityId) -> Option<ConnectionId> {
        let bindings = self.bindings.lock().await;
        bindings.by_identity.get(identity).copied()
    }
}
