//! UseCase: 接続の開始
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 接続を Presence Registry に登録し、購読すべき部屋の一覧を返す
//!
//! ### なぜこのテストが必要か
//! - 接続直後から参加中の全ての部屋のメッセージを受け取れることを保証する
//! - single-session ポリシーでは古い接続を閉じる必要がある
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加中の部屋がある ID の接続
//! - エッジケース：同じ ID の 2 本目の接続（ポリシーごとの扱い）

use std::sync::Arc;

use crate::{
    config::PresencePolicy,
    domain::{ConnectionId, IdentityId, PresenceRegistry, RoomId},
};

use super::{coordinator::RoomMembershipCoordinator, error::ConnectError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOutcome {
    /// Rooms the new connection must be subscribed to
    pub rooms: Vec<RoomId>,
    /// Older connection to close (single-session policy only)
    pub superseded: Option<ConnectionId>,
}

/// 接続開始のユースケース
pub struct ConnectParticipantUseCase {
    coordinator: Arc<RoomMembershipCoordinator>,
    presence: Arc<dyn PresenceRegistry>,
    policy: PresencePolicy,
}

impl ConnectParticipantUseCase {
    pub fn new(
        coordinator: Arc<RoomMembershipCoordinator>,
        presence: Arc<dyn PresenceRegistry>,
        policy: PresencePolicy,
    ) -> Self {
        Self {
            coordinator,
            presence,
            policy,
        }
    }

    /// 接続を登録する
    ///
    /// # Arguments
    ///
    /// * `identity` - トークンから取り出した呼び出し元の ID
    /// * `connection` - 新しい接続のハンドル
    pub async fn execute(
        &self,
        identity: &IdentityId,
        connection: ConnectionId,
    ) -> Result<ConnectOutcome, ConnectError> {
        let rooms = self
            .coordinator
            .list_rooms_for_identity(identity)
            .await?
            .into_iter()
            .map(|summary| summary.room_id)
            .collect();

        let previous = self.presence.bind(identity, connection).await;
        let superseded = match self.policy {
            PresencePolicy::SingleSession => previous,
            PresencePolicy::MultiDevice => None,
        };
        if let Some(old) = superseded {
            tracing::info!(identity = %identity, old = %old, new = %connection, "Superseding previous connection");
        }

        Ok(ConnectOutcome { rooms, superseded })
    }
}
