//! Test fixtures: an in-process server bound to an ephemeral port.
#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use hiroba_server::{
    ServerConfig,
    domain::{IdentityId, TokenService},
    infrastructure::InMemoryIdentityStore,
    ui::{Server, state::AppState},
};
use serde_json::Value;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
    time::timeout,
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message,
};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const KNOWN_USERS: [(&str, &str); 3] = [("alice", "Alice"), ("bob", "Bob"), ("carol", "Carol")];

pub struct TestServer {
    addr: SocketAddr,
    state: Arc<AppState>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(&[]).await
    }

    /// Start with extra command-line flags, e.g. `["--max-participants", "1"]`
    pub async fn start_with(extra_args: &[&str]) -> Self {
        let mut args = vec![
            "hiroba-server",
            "--jwt-secret",
            "integration-test-secret",
            "--dev-token-endpoint",
        ];
        args.extend_from_slice(extra_args);
        let config = ServerConfig::parse_from(args);

        let identities = InMemoryIdentityStore::new();
        for (id, name) in KNOWN_USERS {
            identities
                .upsert(IdentityId::new(id.to_string()).unwrap(), name)
                .await;
        }

        let server = Server::new(&config, Arc::new(identities));
        let state = server.state().clone();
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            server
                .serve(listener, async move {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        Self {
            addr,
            state,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Signed access token for a seeded user
    pub fn token(&self, name: &str) -> String {
        self.state
            .tokens
            .sign(&IdentityId::new(name.to_string()).unwrap())
            .expect("sign token")
    }

    pub fn ws_url(&self, token: &str) -> String {
        format!("ws://{}/ws?token={}", self.addr, token)
    }

    /// Open a WebSocket as `name` and consume the `socket/registered` frame.
    pub async fn connect(&self, name: &str) -> (WsStream, Value) {
        let (mut ws, _) = connect_async(self.ws_url(&self.token(name)))
            .await
            .expect("websocket connect");
        let registered = next_event_of(&mut ws, "socket/registered").await;
        (ws, registered)
    }

    /// Create a room over HTTP and return its id
    pub async fn create_room(&self, owner: &str, title: &str) -> String {
        let body: Value = reqwest::Client::new()
            .post(self.url("/api/chat/rooms"))
            .bearer_auth(self.token(owner))
            .json(&serde_json::json!({ "title": title }))
            .send()
            .await
            .expect("create room")
            .json()
            .await
            .expect("room json");
        body["roomId"].as_str().expect("roomId").to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Next raw frame, failing the test after 5 seconds
pub async fn next_message(ws: &mut WsStream) -> Message {
    timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timed out waiting for a frame")
        .expect("stream ended")
        .expect("websocket error")
}

/// Next JSON event, skipping control frames
pub async fn next_event(ws: &mut WsStream) -> Value {
    loop {
        match next_message(ws).await {
            Message::Text(text) => return serde_json::from_str(text.as_str()).expect("json frame"),
            Message::Close(frame) => panic!("connection closed: {frame:?}"),
            _ => continue,
        }
    }
}

/// Skip events until one of `event_type` arrives
pub async fn next_event_of(ws: &mut WsStream, event_type: &str) -> Value {
    loop {
        let event = next_event(ws).await;
        if event["type"] == event_type {
            return event;
        }
    }
}

pub async fn send_event(ws: &mut WsStream, event: Value) {
    ws.send(Message::Text(event.to_string().into()))
        .await
        .expect("send frame");
}
