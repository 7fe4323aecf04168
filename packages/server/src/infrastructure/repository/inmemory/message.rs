//! InMemory Message Log 実装
//!
//! 部屋ごとに `(created_at, message_id)` をキーとする BTreeMap を持ち、
//! 新しい順のページ取得と「カーソルより古いメッセージの有無」を範囲走査で求めます。

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, MessageCursor, MessageId, MessageRepository, RepositoryError, RoomId, Timestamp,
};

type RoomLog = BTreeMap<(Timestamp, MessageId), ChatMessage>;

/// インメモリ Message Log 実装
#[derive(Default)]
pub struct InMemoryMessageRepository {
    logs: Arc<Mutex<HashMap<RoomId, RoomLog>>>,
}

impl InMemoryMessageRepository {
    /// 新しい InMemoryMessageRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 部屋のメッセージ件数（テスト・デバッグ用）
    pub async fn count_by_room(&self, room_id: &RoomId) -> usize {
        let logs = self.logs.lock().await;
        logs.get(room_id).map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(&self, message: ChatMessage) -> Result<(), RepositoryError> {
        let mut logs = self.logs.lock().await;
        logs.entry(message.room_id.clone())
            .or_default()
            .insert(message.sort_key(), message);
        Ok(())
    }

    async fn find_before(
        &self,
        room_id: &RoomId,
        cursor: Option<MessageCursor>,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let logs = self.logs.lock().await;
        let Some(log) = logs.get(room_id) else {
            return Ok(Vec::new());
        };
        Ok(log
            .iter()
            .rev()
            .filter(|((created_at, id), _)| {
                cursor.is_none_or(|c| c.admits(*created_at, *id))
            })
            .take(limit)
            .map(|(_, message)| message.clone())
            .collect())
    }

    async fn exists_before(
        &self,
        room_id: &RoomId,
        cursor: MessageCursor,
    ) -> Result<bool, RepositoryError> {
        let logs = self.logs.lock().await;
        Ok(logs.get(room_id).is_some_and(|log| {
            log.keys()
                .next()
                .is_some_and(|(created_at, id)| cursor.admits(*created_at, *id))
        }))
    }

    async fn delete_by_room(&self, room_id: &RoomId) -> Result<usize, RepositoryError> {
        let mut logs = self.logs.lock().await;
        Ok(logs.remove(room_id).map_or(0, |log| log.len()))
    }
}
