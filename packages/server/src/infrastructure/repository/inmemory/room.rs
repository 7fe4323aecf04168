//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! 全ての更新操作は 1 回のロック取得の中で「条件確認 → 更新」を完結させます。
//! ドキュメントストアの条件付き更新（`findOneAndUpdate` / `findOneAndDelete`）に
//! 相当する原子性を、Mutex のクリティカルセクションで実現しています。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{IdentityId, RepositoryError, Room, RoomId, RoomRepository};

/// インメモリ Room Repository 実装
///
/// ドメイン層の RoomRepository trait を実装します（依存性の逆転）。
#[derive(Default)]
pub struct InMemoryRoomRepository {
    /// room_id -> Room
    rooms: Arc<Mutex<HashMap<RoomId, Room>>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first(mut rooms: Vec<Room>) -> Vec<Room> {
        rooms.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        rooms
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn insert(&self, room: Room) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(&room.id) {
            return Err(RepositoryError::RoomAlreadyExists(room.id.into_string()));
        }
        rooms.insert(room.id.clone(), room);
        Ok(())
    }

    async fn find_by_id(&self, room_id: &RoomId) -> Result<Option<Room>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms.get(room_id).cloned())
    }

    async fn add_participant(
        &self,
        room_id: &RoomId,
        identity: &IdentityId,
    ) -> Result<bool, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.to_string()))?;
        Ok(room.add_participant(identity.clone())?)
    }

    async fn remove_participant(
        &self,
        room_id: &RoomId,
        identity: &IdentityId,
    ) -> Result<usize, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.to_string()))?;
        if !room.remove_participant(identity) {
            return Err(RepositoryError::ParticipantNotFound {
                room_id: room_id.to_string(),
                identity: identity.to_string(),
            });
        }
        Ok(room.participant_count())
    }

    async fn is_participant(
        &self,
        room_id: &RoomId,
        identity: &IdentityId,
    ) -> Result<bool, RepositoryError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms
            .get(room_id)
            .is_some_and(|room| room.is_participant(identity)))
    }

    async fn delete_if_empty(&self, room_id: &RoomId) -> Result<bool, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        // 既に誰かが削除した、または参加者がまだ残っている場合は false
        let empty = rooms
            .get(room_id)
            .is_some_and(|room| room.participant_count() == 0);
        if empty {
            rooms.remove(room_id);
        }
        Ok(empty)
    }

    async fn list_all(&self) -> Result<Vec<Room>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        let listed = rooms
            .values()
            .filter(|room| room.participant_count() > 0)
            .cloned()
            .collect();
        Ok(Self::newest_first(listed))
    }

    async fn list_by_participant(
        &self,
        identity: &IdentityId,
    ) -> Result<Vec<Room>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        let listed = rooms
            .values()
            .filter(|room| room.is_participant(identity))
            .cloned()
            .collect();
        Ok(Self::newest_first(listed))
    }
}
