//! UseCase: 部屋の作成

use std::sync::Arc;

use crate::domain::{IdentityId, IdentityStore, Room, RoomTitle};

use super::{coordinator::RoomMembershipCoordinator, error::CoordinatorError, identity::ensure_known};

/// 部屋作成のユースケース
pub struct CreateRoomUseCase {
    coordinator: Arc<RoomMembershipCoordinator>,
    identities: Arc<dyn IdentityStore>,
}

impl CreateRoomUseCase {
    pub fn new(
        coordinator: Arc<RoomMembershipCoordinator>,
        identities: Arc<dyn IdentityStore>,
    ) -> Self {
        Self {
            coordinator,
            identities,
        }
    }

    /// 部屋を作成し、作成者を唯一の参加者にする
    ///
    /// # Returns
    ///
    /// * `Ok(Room)` - 作成された部屋
    /// * `Err(CoordinatorError::Unauthorized)` - 作成者が存在しない
    /// * `Err(CoordinatorError::InvalidContent)` - タイトルが空、または長すぎる
    pub async fn execute(
        &self,
        creator: &IdentityId,
        title: String,
    ) -> Result<Room, CoordinatorError> {
        ensure_known(self.identities.as_ref(), creator).await?;
        let title = RoomTitle::new(title)?;
        self.coordinator.create_room(creator, title).await
    }
}
