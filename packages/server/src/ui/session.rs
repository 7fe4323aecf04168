//! Per-connection event handling.
//!
//! 1 本の WebSocket 接続が受け取ったイベントを順番に処理します。応答は
//! ConnectionHub 経由で自分の送信キューに積むため、部屋への配信と順序が入れ替わりません。

use std::{sync::Arc, time::Instant};

use hiroba_shared::time::now_millis;

use crate::{
    domain::{ConnectionId, HistoryLimit, IdentityId, MessageCursor, RoomId},
    infrastructure::dto::websocket::{ClientEvent, HistoryPageDto, MessageDto, ServerEvent},
    usecase::CoordinatorError,
};

use super::state::AppState;

struct CachedName {
    value: Option<String>,
    fetched_at: Instant,
}

pub(crate) struct ConnectionSession {
    state: Arc<AppState>,
    connection: ConnectionId,
    identity: IdentityId,
    display_name: Option<CachedName>,
}

impl ConnectionSession {
    pub(crate) fn new(state: Arc<AppState>, connection: ConnectionId, identity: IdentityId) -> Self {
        Self {
            state,
            connection,
            identity,
            display_name: None,
        }
    }

    /// Parse and handle one text frame. Malformed frames get an error reply.
    pub(crate) async fn handle_text(&mut self, text: &str) {
        match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => self.handle(event).await,
            Err(e) => {
                tracing::debug!(connection = %self.connection, error = %e, "Malformed client event");
                self.reply(&ServerEvent::error("BAD_REQUEST", format!("malformed event: {e}")))
                    .await;
            }
        }
    }

    pub(crate) async fn handle(&mut self, event: ClientEvent) {
        let result = match event {
            ClientEvent::JoinRoom { room_id } => self.join(room_id).await,
            ClientEvent::LeaveRoom { room_id } => self.leave(room_id).await,
            ClientEvent::SendMessage { room_id, content } => self.send(room_id, content).await,
            ClientEvent::FetchHistory {
                room_id,
                cursor,
                cursor_id,
                limit,
            } => self.history(room_id, cursor, cursor_id, limit).await,
            ClientEvent::Ping { echo } => {
                self.reply(&ServerEvent::Pong {
                    at: now_millis(),
                    echo,
                })
                .await;
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::debug!(connection = %self.connection, identity = %self.identity, error = %e, "Event rejected");
            self.reply(&ServerEvent::error(e.code(), e.to_string())).await;
        }
    }

    async fn join(&mut self, room_id: String) -> Result<(), CoordinatorError> {
        let room_id = RoomId::new(room_id)?;
        let outcome = self.state.join_room().execute(&self.identity, &room_id).await?;
        self.state
            .sync_room_subscription(self.connection, &self.identity, &room_id)
            .await?;
        self.reply(&ServerEvent::from(&outcome)).await;

        // Catch the joiner up on recent history
        let page = self
            .state
            .fetch_history()
            .execute(&self.identity, &room_id, HistoryLimit::default(), None)
            .await?;
        self.reply(&ServerEvent::History(HistoryPageDto::from(&page)))
            .await;
        Ok(())
    }

    async fn leave(&mut self, room_id: String) -> Result<(), CoordinatorError> {
        let room_id = RoomId::new(room_id)?;
        let outcome = self.state.leave_room().execute(&self.identity, &room_id).await?;
        self.state
            .sync_room_subscription(self.connection, &self.identity, &room_id)
            .await?;
        self.reply(&ServerEvent::from(&outcome)).await;
        Ok(())
    }

    async fn send(&mut self, room_id: String, content: String) -> Result<(), CoordinatorError> {
        let room_id = RoomId::new(room_id)?;
        let message = self
            .state
            .coordinator
            .send_message(&room_id, &self.identity, content)
            .await?;
        let user_name = self.display_name().await;

        let event = ServerEvent::NewMessage {
            message: MessageDto::from_message(&message, user_name),
        };
        let delivered = self.state.hub.broadcast_to_room(&room_id, &event).await;
        tracing::debug!(room_id = %room_id, message_id = %message.id, delivered, "Message broadcast");
        Ok(())
    }

    async fn history(
        &mut self,
        room_id: String,
        cursor: Option<String>,
        cursor_id: Option<String>,
        limit: Option<usize>,
    ) -> Result<(), CoordinatorError> {
        let room_id = RoomId::new(room_id)?;
        let limit = HistoryLimit::from_request(limit)?;
        let cursor = cursor
            .as_deref()
            .map(|cursor| MessageCursor::parse(cursor, cursor_id.as_deref()))
            .transpose()?;

        let page = self
            .state
            .fetch_history()
            .execute(&self.identity, &room_id, limit, cursor)
            .await?;
        self.reply(&ServerEvent::History(HistoryPageDto::from(&page)))
            .await;
        Ok(())
    }

    /// This connection's display name, refreshed once the cache entry expires.
    async fn display_name(&mut self) -> Option<String> {
        if let Some(cached) = &self.display_name
            && cached.fetched_at.elapsed() < self.state.name_cache_ttl
        {
            return cached.value.clone();
        }

        let value = match self.state.identities.find_name(&self.identity).await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(identity = %self.identity, error = %e, "Failed to resolve display name");
                None
            }
        };
        self.display_name = Some(CachedName {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        value
    }

    async fn reply(&self, event: &ServerEvent) {
        self.state.hub.send_to_connection(self.connection, event).await;
    }
}
