//! Vigil transport layer.
//!
//! The thin, replaceable I/O boundary: an Axum HTTP server that upgrades
//! `/ws` requests into WebSocket sessions, serves static assets from the
//! working directory, and reports liveness over `/health`. The session
//! core drives each accepted connection through the [`WsTransport`]
//! adapter — nothing here touches per-session state directly.

pub mod server;
pub mod ws;

pub use server::{TransportConfig, TransportServer};
pub use ws::WsTransport;
