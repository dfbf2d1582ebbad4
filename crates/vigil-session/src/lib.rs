//! Vigil session core.
//!
//! The per-connection lifecycle coordinator: for each connected client, a
//! set of concurrent tasks reads inbound messages, echoes responses,
//! tracks last-activity time, emits periodic inactivity warnings, and
//! forcibly terminates the connection after a fixed idle window — all
//! without races on the shared per-session state.
//!
//! The core is transport-agnostic: the wire sits behind the traits in
//! [`transport`], so the same supervisor runs over a real WebSocket or an
//! in-memory channel pair in tests.

pub mod clock;
pub mod deadline;
pub mod registry;
pub mod session;
pub mod transport;

pub use clock::ActivityClock;
pub use deadline::IdleDeadline;
pub use registry::{SessionRegistry, SessionSlot};
pub use session::{CloseReason, Session, SessionConfig};
pub use transport::{MessageSink, MessageStream, SessionTransport, TransportError};
