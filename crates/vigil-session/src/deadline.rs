//! Resettable idle deadline.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::Instant;

/// A resettable deadline with expiry delivered as a single notification.
///
/// The inbound loop re-arms it on every message; the supervisor consumes
/// the expiry. `stop()` parks the deadline permanently, so a stale fire
/// cannot land after teardown has begun.
#[derive(Debug, Clone)]
pub struct IdleDeadline {
    inner: Arc<DeadlineInner>,
}

#[derive(Debug)]
struct DeadlineInner {
    deadline: Mutex<Option<Instant>>,
    changed: Notify,
}

impl IdleDeadline {
    /// Create the deadline armed `window` from now.
    pub fn new(window: Duration) -> Self {
        Self {
            inner: Arc::new(DeadlineInner {
                deadline: Mutex::new(Some(Instant::now() + window)),
                changed: Notify::new(),
            }),
        }
    }

    /// Re-arm the deadline `window` from now.
    pub fn reset(&self, window: Duration) {
        *self.inner.deadline.lock() = Some(Instant::now() + window);
        self.inner.changed.notify_waiters();
    }

    /// Disarm. A stopped deadline never expires.
    pub fn stop(&self) {
        *self.inner.deadline.lock() = None;
        self.inner.changed.notify_waiters();
    }

    /// Resolves once the armed deadline passes without a reset; pends
    /// forever after `stop()`.
    pub async fn expired(&self) {
        loop {
            // Wakeup interest must be registered before the deadline is
            // sampled, or a reset racing the sample is lost.
            let changed = self.inner.changed.notified();
            tokio::pin!(changed);
            changed.as_mut().enable();

            let armed = *self.inner.deadline.lock();
            match armed {
                Some(at) => {
                    tokio::select! {
                        _ = tokio::time::sleep_until(at) => {
                            // The deadline may have moved while we slept.
                            if *self.inner.deadline.lock() == Some(at) {
                                return;
                            }
                        }
                        _ = &mut changed => {}
                    }
                }
                None => changed.await,
            }
        }
    }
}
