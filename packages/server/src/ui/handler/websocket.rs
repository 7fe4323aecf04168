//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
    },
    http::HeaderMap,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionIdFactory, IdentityId},
    infrastructure::dto::websocket::ServerEvent,
    ui::{
        auth::authenticate,
        error::ApiError,
        hub::Outbound,
        session::ConnectionSession,
        state::{AppState, ConnectQuery},
    },
};

/// Application close code for a connection replaced by a newer one
const SESSION_SUPERSEDED_CLOSE_CODE: u16 = 4001;

/// Authenticate, then upgrade. The token comes from `Authorization: Bearer`
/// or, for browser clients, the `token` query parameter.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let identity = authenticate(state.tokens.as_ref(), &headers, query.token.as_deref())
        .map_err(|e| {
            tracing::warn!(error = %e, "WebSocket upgrade rejected");
            ApiError::from(e)
        })?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, identity)))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>, identity: IdentityId) {
    let connection = ConnectionIdFactory::generate();
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Register before listing rooms so a concurrent join from another device
    // still reaches this connection through the identity's personal group.
    state.hub.register(connection, identity.clone(), tx).await;

    let outcome = match state
        .connect_participant()
        .execute(&identity, connection)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(identity = %identity, error = %e, "Connection setup failed");
            state.hub.unregister(connection).await;
            if let Ok(json) = serde_json::to_string(&ServerEvent::error("INTERNAL_ERROR", e.to_string())) {
                let _ = socket.send(Message::Text(json.into())).await;
            }
            return;
        }
    };

    if let Some(previous) = outcome.superseded {
        let notice = ServerEvent::SessionSuperseded {
            reason: "a newer connection was opened for this identity".to_string(),
        };
        state.hub.close(previous, &notice, "superseded").await;
    }
    // The room list may already be stale if another device left meanwhile
    let mut rooms = Vec::with_capacity(outcome.rooms.len());
    for room_id in outcome.rooms {
        match state
            .sync_room_subscription(connection, &identity, &room_id)
            .await
        {
            Ok(true) => rooms.push(room_id),
            Ok(false) => {}
            Err(e) => {
                tracing::error!(connection = %connection, room_id = %room_id, error = %e, "Failed to subscribe connection to room");
            }
        }
    }
    state
        .hub
        .send_to_connection(
            connection,
            &ServerEvent::registered(connection, &identity, &rooms),
        )
        .await;
    tracing::info!(identity = %identity, connection = %connection, rooms = rooms.len(), "Client connected");

    let (mut sender, mut receiver) = socket.split();

    // Spawn a task to drain this connection's queue into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            match outbound {
                Outbound::Frame(text) => {
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Outbound::Close(reason) => {
                    let frame = CloseFrame {
                        code: SESSION_SUPERSEDED_CLOSE_CODE,
                        reason: reason.into(),
                    };
                    let _ = sender.send(Message::Close(Some(frame))).await;
                    break;
                }
            }
        }
    });

    // Spawn a task to handle events from this client
    let mut session = ConnectionSession::new(state.clone(), connection, identity.clone());
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!(connection = %connection, error = %e, "WebSocket error");
                    break;
                }
            };

            match msg {
                Message::Text(text) => session.handle_text(text.as_str()).await,
                Message::Close(_) => {
                    tracing::debug!(connection = %connection, "Client requested close");
                    break;
                }
                // Ping/pong frames are answered by the WebSocket layer
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Room memberships are durable; only the live connection goes away
    state.hub.unregister(connection).await;
    state.disconnect_participant().execute(connection).await;
    tracing::info!(identity = %identity, connection = %connection, "Client disconnected");
}
