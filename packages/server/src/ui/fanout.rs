//! Domain event fan-out.
//!
//! Coordinator が発行した DomainEvent を 1 つのタスクで順番に処理し、
//! 配信グループの更新と参加者変更の通知を行います。

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::DomainEvent,
    infrastructure::dto::websocket::{MembershipChange, ServerEvent},
};

use super::hub::ConnectionHub;

/// Spawn the consumer of the domain event channel.
///
/// The task ends when every publisher has been dropped.
pub fn spawn_event_fanout(
    mut events: mpsc::UnboundedReceiver<DomainEvent>,
    hub: Arc<ConnectionHub>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            apply(&hub, event).await;
        }
        tracing::debug!("Domain event channel closed");
    })
}

pub(crate) async fn apply(hub: &ConnectionHub, event: DomainEvent) {
    tracing::debug!(?event, "Fan-out");
    match event {
        DomainEvent::RoomCreated { room_id, creator } => {
            hub.subscribe_identity(&creator, &room_id).await;
        }
        DomainEvent::ParticipantAdded { room_id, identity } => {
            hub.subscribe_identity(&identity, &room_id).await;
            let notice = ServerEvent::membership_changed(&room_id, &identity, MembershipChange::Joined);
            hub.broadcast_to_room(&room_id, &notice).await;
        }
        DomainEvent::ParticipantRemoved {
            room_id,
            identity,
            remaining,
        } => {
            hub.unsubscribe_identity(&identity, &room_id).await;
            if remaining > 0 {
                let notice =
                    ServerEvent::membership_changed(&room_id, &identity, MembershipChange::Left);
                hub.broadcast_to_room(&room_id, &notice).await;
            }
        }
        DomainEvent::RoomDeleted { room_id, .. } => {
            hub.drop_room(&room_id).await;
        }
    }
}
