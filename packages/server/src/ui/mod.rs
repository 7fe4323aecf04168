//! UI layer: HTTP API, WebSocket gateway and realtime fan-out.

mod auth;
mod error;
mod fanout;
mod handler;
mod hub;
mod runner;
mod session;
mod signal;
pub mod state;

pub use error::ApiError;
pub use hub::ConnectionHub;
pub use runner::{Server, ServerError, build_router, run};
