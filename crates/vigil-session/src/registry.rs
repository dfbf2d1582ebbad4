//! SessionRegistry — the process-wide map of live sessions.

use std::collections::HashMap;

use parking_lot::RwLock;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info};
use uuid::Uuid;
use vigil_protocol::ClientId;

/// One live (or tearing-down) session.
struct SessionEntry {
    instance: Uuid,
    closed: CancellationToken,
    done: CancellationToken,
}

/// What [`SessionRegistry::register`] hands the session supervisor.
///
/// Carries the session's closed-signal and, through the drop guard, the
/// done-signal the registry waits on when this session is replaced. The
/// guard releases the done-signal even on early-exit paths.
pub struct SessionSlot {
    pub id: ClientId,
    pub instance: Uuid,
    pub closed: CancellationToken,
    _done: DropGuard,
}

/// Process-wide mapping from client id to live session.
///
/// Constructed once at server start and shared as an `Arc` — there is no
/// implicit global. Every mutation happens under a short write lock;
/// async teardown waits happen outside it.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<ClientId, SessionEntry>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a session for `id`, replacing any prior one.
    ///
    /// A prior session is cancelled and fully torn down before this
    /// returns — the map holds at most one entry per id at any time, and
    /// the replaced session's resources are released before the new
    /// session starts.
    pub async fn register(&self, id: ClientId) -> SessionSlot {
        let instance = Uuid::new_v4();
        let closed = CancellationToken::new();
        let done = CancellationToken::new();

        let entry = SessionEntry {
            instance,
            closed: closed.clone(),
            done: done.clone(),
        };

        let prior = { self.sessions.write().insert(id, entry) };
        if let Some(prior) = prior {
            info!("Client {id} reconnected — tearing down the prior session");
            prior.closed.cancel();
            prior.done.cancelled().await;
        }

        SessionSlot {
            id,
            instance,
            closed,
            _done: done.drop_guard(),
        }
    }

    /// Remove the session for `id` if it is still the same registration.
    /// Idempotent; a late unregister from a replaced session is a no-op.
    pub fn unregister(&self, id: ClientId, instance: Uuid) -> bool {
        let mut sessions = self.sessions.write();
        match sessions.get(&id) {
            Some(entry) if entry.instance == instance => {
                sessions.remove(&id);
                true
            }
            _ => {
                debug!("Stale unregister for client {id} ignored");
                false
            }
        }
    }

    pub fn contains(&self, id: ClientId) -> bool {
        self.sessions.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Ids of the currently live sessions, for diagnostics.
    pub fn client_ids(&self) -> Vec<ClientId> {
        let mut ids: Vec<_> = self.sessions.read().keys().copied().collect();
        ids.sort_by_key(|id| id.get());
        ids
    }

    /// Cancel every live session. Called at server stop; each session
    /// unregisters itself as its teardown completes.
    pub fn close_all(&self) {
        for entry in self.sessions.read().values() {
            entry.closed.cancel();
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
