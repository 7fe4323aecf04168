//! UseCase: 履歴の取得
//!
//! 参加者だけが部屋のメッセージ履歴を読めます。表示名は著者ごとに 1 回だけ
//! Identity Store に問い合わせます。

use std::{collections::HashMap, sync::Arc};

use crate::domain::{
    ChatMessage, HistoryLimit, IdentityId, IdentityStore, MessageCursor, RoomId,
};

use super::{coordinator::RoomMembershipCoordinator, error::CoordinatorError};

/// A history entry with the author's display name, if known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub message: ChatMessage,
    pub author_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPage {
    pub room_id: RoomId,
    /// Newest first
    pub entries: Vec<HistoryEntry>,
    pub has_more: bool,
    pub next_cursor: Option<MessageCursor>,
}

/// 履歴取得のユースケース
pub struct FetchHistoryUseCase {
    coordinator: Arc<RoomMembershipCoordinator>,
    identities: Arc<dyn IdentityStore>,
}

impl FetchHistoryUseCase {
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
    /// * `Ok(HistoryPage)` - `cursor` より古いメッセージを新しい順に最大 `limit` 件
    /// * `Err(CoordinatorError::Forbidden)` - 参加者ではない
    pub async fn execute(
        &self,
        reader: &IdentityId,
        room_id: &RoomId,
        limit: HistoryLimit,
        cursor: Option<MessageCursor>,
    ) -> Result<HistoryPage, CoordinatorError> {
        if !self.coordinator.is_participant(room_id, reader).await? {
            return Err(CoordinatorError::Forbidden(format!(
                "{reader} is not a participant of room {room_id}"
            )));
        }

        let page = self.coordinator.list_messages(room_id, limit, cursor).await?;
        let names = self.resolve_names(&page.messages).await;
        let entries = page
            .messages
            .into_iter()
            .map(|message| {
                let author_name = names.get(&message.author).cloned().flatten();
                HistoryEntry {
                    message,
                    author_name,
                }
            })
            .collect();

        Ok(HistoryPage {
            room_id: room_id.clone(),
            entries,
            has_more: page.has_more,
            next_cursor: page.next_cursor,
        })
    }

    /// Look each distinct author up once. Lookup failures leave the name empty.
    async fn resolve_names(
        &self,
        messages: &[ChatMessage],
    ) -> HashMap<IdentityId, Option<String>> {
        let mut names = HashMap::new();
        for message in messages {
            if names.contains_key(&message.author) {
                continue;
            }
            let name = match self.identities.find_name(&message.author).await {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!(identity = %message.author, error = %e, "Failed to resolve display name");
                    None
                }
            };
            names.insert(message.author.clone(), name);
        }
        names
    }
}
