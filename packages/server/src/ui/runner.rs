//! Server assembly and lifecycle.

use std::{future::Future, sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::{net::TcpListener, task::JoinHandle};
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    domain::IdentityStore,
    infrastructure::{
        ChannelEventPublisher, InMemoryIdentityStore, InMemoryMessageRepository,
        InMemoryPresenceRegistry, InMemoryRoomRepository, JwtTokenService,
        identity::IdentitySeedError,
    },
    usecase::RoomMembershipCoordinator,
};

use super::{
    fanout::spawn_event_fanout, handler, hub::ConnectionHub, signal::shutdown_signal,
    state::AppState,
};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    IdentitySeed(#[from] IdentitySeedError),
}

/// A wired-up server: shared state plus the domain event fan-out task
pub struct Server {
    state: Arc<AppState>,
    fanout: JoinHandle<()>,
}

impl Server {
    /// Wire in-memory storage, the token service and the fan-out task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: &ServerConfig, identities: Arc<dyn IdentityStore>) -> Self {
        let (publisher, events) = ChannelEventPublisher::channel();
        let coordinator = RoomMembershipCoordinator::new(
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(InMemoryMessageRepository::new()),
            Arc::new(publisher),
        )
        .with_participant_capacity(config.max_participants);

        let hub = Arc::new(ConnectionHub::new());
        let fanout = spawn_event_fanout(events, hub.clone());

        let state = Arc::new(AppState {
            coordinator: Arc::new(coordinator),
            identities,
            tokens: Arc::new(JwtTokenService::new(
                &config.jwt_secret,
                chrono::Duration::minutes(config.token_ttl_minutes),
            )),
            presence: Arc::new(InMemoryPresenceRegistry::new()),
            hub,
            presence_policy: config.presence_policy,
            name_cache_ttl: Duration::from_secs(config.name_cache_ttl_secs),
            dev_token_endpoint: config.dev_token_endpoint,
        });

        Self { state, fanout }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Serve until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await;
        self.fanout.abort();
        result
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/api/health", get(handler::health_check))
        .route(
            "/api/chat/rooms",
            post(handler::create_room).get(handler::list_rooms),
        )
        .route("/api/chat/my-rooms", get(handler::list_my_rooms))
        .route("/api/chat/rooms/{room_id}/join", post(handler::join_room))
        .route("/api/chat/rooms/{room_id}/leave", post(handler::leave_room))
        .route(
            "/api/chat/rooms/{room_id}/messages",
            get(handler::list_messages),
        )
        .route("/api/chat/rooms/{room_id}/members", get(handler::list_members))
        .route("/ws", get(handler::websocket_handler));

    if state.dev_token_endpoint {
        router = router.route("/api/tokens", post(handler::issue_token));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Run the server until SIGINT / SIGTERM.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let identities = match &config.users {
        Some(path) => InMemoryIdentityStore::load_from_file(path).await?,
        None => {
            tracing::warn!("No identity seed file given; every identity will be rejected");
            InMemoryIdentityStore::new()
        }
    };
    tracing::info!(identities = identities.len().await, "Identity store loaded");

    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        presence_policy = ?config.presence_policy,
        "Chat server listening"
    );
    if config.dev_token_endpoint {
        tracing::warn!("Development token endpoint is enabled");
    }

    Server::new(&config, Arc::new(identities))
        .serve(listener, shutdown_signal())
        .await?;

    tracing::info!("Chat server stopped");
    Ok(())
}
