//! The transport seam.
//!
//! The session core never touches a socket directly — the boundary
//! implements these traits over whatever carries the connection, and the
//! core only sees text messages. The upgrade handshake, frame types, and
//! close protocol all stay on the boundary's side of the seam.

use std::future::Future;

use thiserror::Error;

/// Mid-session I/O failure. Always terminal for the affected session and
/// never retried; it must not reach any other session.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport read failed: {0}")]
    Read(String),
    #[error("transport write failed: {0}")]
    Write(String),
}

/// A bidirectional message channel, splittable into its two halves so the
/// inbound loop and the outbound writer can run concurrently.
pub trait SessionTransport: Send + 'static {
    type Tx: MessageSink;
    type Rx: MessageStream;

    fn split(self) -> (Self::Tx, Self::Rx);
}

/// Receiving half. `recv` blocks until a message arrives, an error
/// occurs, or the stream ends (`None`).
pub trait MessageStream: Send + 'static {
    fn recv(&mut self) -> impl Future<Output = Option<Result<String, TransportError>>> + Send;
}

/// Sending half. Only the session's writer task holds one, which makes
/// transport closure a single-owner operation — other tasks may only
/// request it via the closed-signal.
pub trait MessageSink: Send + 'static {
    fn send(&mut self, text: String) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Close the channel. Must tolerate an already-closed peer.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}
