//! UseCase: 接続の終了
//!
//! 接続が閉じても部屋の参加状態は変わりません。Presence Registry から
//! この接続の登録だけを取り除きます。

use std::sync::Arc;

use crate::domain::{ConnectionId, PresenceRegistry};

/// 接続終了のユースケース
pub struct DisconnectParticipantUseCase {
    presence: Arc<dyn PresenceRegistry>,
}

impl DisconnectParticipantUseCase {
    pub fn new(presence: Arc<dyn PresenceRegistry>) -> Self {
        Self { presence }
    }

    pub async fn execute(&self, connection: ConnectionId) {
        self.presence.unbind(connection).await;
        tracing::debug!(connection = %connection, "Connection unbound");
    }
}
