//! UseCase: 部屋からの退出
//!
//! 参加者を削除し、残りが 0 人になったら部屋とメッセージを削除します。
//! 削除は条件付きなので、その間に誰かが参加していれば部屋は残ります。

use std::sync::Arc;

use crate::domain::{IdentityId, IdentityStore, RoomId};

use super::{coordinator::RoomMembershipCoordinator, error::CoordinatorError, identity::ensure_known};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    pub room_id: RoomId,
    pub remaining_participants: usize,
    pub room_deleted: bool,
    pub deleted_message_count: usize,
}

/// 部屋退出のユースケース
pub struct LeaveRoomUseCase {
    coordinator: Arc<RoomMembershipCoordinator>,
    identities: Arc<dyn IdentityStore>,
}

impl LeaveRoomUseCase {
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
    /// * `Ok(LeaveOutcome)` - 退出完了（部屋が削除されたかどうかを含む）
    /// * `Err(CoordinatorError::NotFound)` - 参加していない
    /// * `Err(CoordinatorError::RoomNotFound)` - 部屋が存在しない
    pub async fn execute(
        &self,
        identity: &IdentityId,
        room_id: &RoomId,
    ) -> Result<LeaveOutcome, CoordinatorError> {
        ensure_known(self.identities.as_ref(), identity).await?;
        let remaining_participants = self.coordinator.remove_participant(room_id, identity).await?;

        let deletion = if remaining_participants == 0 {
            Some(self.coordinator.delete_room_and_messages(room_id).await?)
        } else {
            None
        };

        Ok(LeaveOutcome {
            room_id: room_id.clone(),
            remaining_participants,
            room_deleted: deletion.is_some_and(|d| d.deleted),
            deleted_message_count: deletion.map_or(0, |d| d.deleted_message_count),
        })
    }
}
