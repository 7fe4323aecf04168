//! Data transfer objects for the HTTP API and the realtime protocol.

pub mod http;
pub mod websocket;
