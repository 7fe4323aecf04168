//! Multi-room chat server library.
//!
//! Durable room membership and per-room message history, with realtime
//! fan-out of new messages to every connected participant over WebSocket.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use ui::run as run_server;
