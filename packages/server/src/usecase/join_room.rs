//! UseCase: 部屋への参加
//!
//! HTTP の `POST /api/chat/rooms/{room_id}/join` と WebSocket の `room.join`
//! のどちらもこのユースケースを使います。既に参加している場合も成功扱いです。

use std::sync::Arc;

use crate::domain::{IdentityId, IdentityStore, RoomId};

use super::{coordinator::RoomMembershipCoordinator, error::CoordinatorError, identity::ensure_known};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub room_id: RoomId,
    pub already_participant: bool,
}

/// 部屋参加のユースケース
pub struct JoinRoomUseCase {
    coordinator: Arc<RoomMembershipCoordinator>,
    identities: Arc<dyn IdentityStore>,
}

impl JoinRoomUseCase {
    pub fn new(
        coordinator: Arc<RoomMembershipCoordinator>,
        identities: Arc<dyn IdentityStore>,
    ) -> Self {
        Self {
            coordinator,
            identities,
        }
    }

    /// # Returns
    ///
    /// * `Ok(JoinOutcome)` - 参加済み（今回追加されたかどうかを含む）
    /// * `Err(CoordinatorError::RoomNotFound)` - 部屋が存在しない
    /// * `Err(CoordinatorError::RoomFull)` - 部屋が満員
    pub async fn execute(
        &self,
        identity: &IdentityId,
        room_id: &RoomId,
    ) -> Result<JoinOutcome, CoordinatorError> {
        ensure_known(self.identities.as_ref(), identity).await?;
        let added = self.coordinator.add_participant(room_id, identity).await?;
        Ok(JoinOutcome {
            room_id: room_id.clone(),
            already_participant: !added,
        })
    }
}
