//! Last-activity tracking shared between session tasks.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// Timestamp of the last inbound message, shared across a session's tasks.
///
/// The inbound loop is the only writer; the inactivity monitor reads it
/// concurrently. Readers always see a consistent snapshot, never a stale
/// or torn value.
#[derive(Debug, Clone)]
pub struct ActivityClock {
    last: Arc<Mutex<Instant>>,
}

impl ActivityClock {
    pub fn new() -> Self {
        Self {
            last: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Record inbound activity. The stored timestamp is monotonically
    /// non-decreasing.
    pub fn touch(&self) {
        *self.last.lock() = Instant::now();
    }

    pub fn last_activity(&self) -> Instant {
        *self.last.lock()
    }

    /// Time elapsed since the last inbound message.
    pub fn idle_for(&self) -> Duration {
        self.last.lock().elapsed()
    }
}

impl Default for ActivityClock {
    fn default() -> Self {
        Self::new()
    }
}
