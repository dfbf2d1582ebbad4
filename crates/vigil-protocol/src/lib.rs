//! Vigil protocol types.
//!
//! Everything a client can observe on the wire lives here: the client
//! identifier and its validation contract, the rejection errors surfaced
//! before a session exists, and the server→client text frames. This crate
//! is the single source of truth for those shapes — no async, no I/O.

pub mod client_id;
pub mod error;
pub mod frames;

pub use client_id::{ClientId, MAX_CLIENT_ID, MIN_CLIENT_ID};
pub use error::ClientIdError;
pub use frames::ServerFrame;
