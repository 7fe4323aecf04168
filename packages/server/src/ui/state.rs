//! Server state shared by every handler.

use std::{sync::Arc, time::Duration};

use serde::Deserialize;

use crate::{
    config::PresencePolicy,
    domain::{ConnectionId, IdentityId, IdentityStore, PresenceRegistry, RoomId, TokenService},
    usecase::{
        ConnectParticipantUseCase, CoordinatorError, CreateRoomUseCase,
        DisconnectParticipantUseCase, FetchHistoryUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        RoomMembershipCoordinator,
    },
};

use super::hub::ConnectionHub;

/// Query parameters for WebSocket connection
#[derive(Debug, Default, Deserialize)]
pub struct ConnectQuery {
    /// Access token for clients that cannot set an Authorization header
    pub token: Option<String>,
}

/// Shared application state
pub struct AppState {
    pub coordinator: Arc<RoomMembershipCoordinator>,
    pub identities: Arc<dyn IdentityStore>,
    pub tokens: Arc<dyn TokenService>,
    pub presence: Arc<dyn PresenceRegistry>,
    /// Live connections and broadcast groups
    pub hub: Arc<ConnectionHub>,
    pub presence_policy: PresencePolicy,
    pub name_cache_ttl: Duration,
    pub dev_token_endpoint: bool,
}

impl AppState {
    pub fn create_room(&self) -> CreateRoomUseCase {
        CreateRoomUseCase::new(self.coordinator.clone(), self.identities.clone())
    }

    pub fn join_room(&self) -> JoinRoomUseCase {
        JoinRoomUseCase::new(self.coordinator.clone(), self.identities.clone())
    }

    pub fn leave_room(&self) -> LeaveRoomUseCase {
        LeaveRoomUseCase::new(self.coordinator.clone(), self.identities.clone())
    }

    pub fn fetch_history(&self) -> FetchHistoryUseCase {
        FetchHistoryUseCase::new(self.coordinator.clone(), self.identities.clone())
    }

    pub fn connect_participant(&self) -> ConnectParticipantUseCase {
        ConnectParticipantUseCase::new(
            self.coordinator.clone(),
            self.presence.clone(),
            self.presence_policy,
        )
    }

    pub fn disconnect_participant(&self) -> DisconnectParticipantUseCase {
        DisconnectParticipantUseCase::new(self.presence.clone())
    }

    /// Make `connection`'s room-group membership match `identity`'s durable
    /// participation and return whether it ends up subscribed.
    ///
    /// 購読を変更した後に参加状態を読み直し、一致するまで繰り返します。読み直し
    /// より後の参加・退出はイベントとして fan-out タスクが後から適用するため、
    /// 別端末からの退出と入れ違いになっても購読が残りません。
    pub async fn sync_room_subscription(
        &self,
        connection: ConnectionId,
        identity: &IdentityId,
        room_id: &RoomId,
    ) -> Result<bool, CoordinatorError> {
        let mut subscribed = self.coordinator.is_participant(room_id, identity).await?;
        loop {
            if subscribed {
                self.hub.subscribe(connection, room_id).await;
            } else {
                self.hub.unsubscribe(connection, room_id).await;
            }

            let participant = self.coordinator.is_participant(room_id, identity).await?;
            if participant == subscribed {
                return Ok(subscribed);
            }
            tracing::debug!(
                connection = %connection,
                room_id = %room_id,
                participant,
                "Membership changed while subscribing; retrying"
            );
            subscribed = participant;
        }
    }
}
