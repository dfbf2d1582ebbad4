//! Server→client text frames.
//!
//! Both frames are built deterministically from the client identifier and
//! the session's observed state. The wording is an observability aid, not
//! a compatibility contract.

use std::time::Duration;

use crate::client_id::ClientId;

/// A text frame the server sends to one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerFrame {
    /// Acknowledgment echoed for every inbound message.
    Echo { client: ClientId, payload: String },
    /// Advisory notice sent while a session sits idle, stating how long
    /// the client has been quiet and how long until forced closure.
    IdleWarning {
        client: ClientId,
        idle: Duration,
        remaining: Duration,
    },
}

impl ServerFrame {
    pub fn echo(client: ClientId, payload: impl Into<String>) -> Self {
        Self::Echo {
            client,
            payload: payload.into(),
        }
    }

    pub fn idle_warning(client: ClientId, idle: Duration, remaining: Duration) -> Self {
        Self::IdleWarning {
            client,
            idle,
            remaining,
        }
    }

    /// Render the frame as the text payload that goes on the wire.
    pub fn to_text(&self) -> String {
        match self {
            Self::Echo { client, payload } => {
                format!("Hi {client}, you just said: {payload}")
            }
            Self::IdleWarning {
                client,
                idle,
                remaining,
            } => {
                format!(
                    "Hi {client}, you haven't communicated for {} seconds. \
                     Connection will be closed in {} seconds.",
                    whole_seconds(*idle),
                    whole_seconds(*remaining),
                )
            }
        }
    }
}

/// Idle durations are reported to the nearest whole second.
fn whole_seconds(d: Duration) -> u64 {
    d.as_secs_f64().round() as u64
}
