//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{
    create_room, health_check, issue_token, join_room, leave_room, list_members, list_messages,
    list_my_rooms, list_rooms,
};

// Re-export WebSocket handlers
pub use websocket::websocket_handler;
