//! Per-connection lifecycle: the session supervisor and its tasks.
//!
//! A session runs three concurrent tasks over one transport: the inbound
//! loop (reads, echoes, feeds the activity clock), the inactivity monitor
//! (advisory idle warnings), and the outbound writer (sole owner of the
//! sink). The supervisor races the idle deadline against the closed-signal
//! and converges every terminal cause on one teardown path.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vigil_protocol::{ClientId, ServerFrame};

use crate::clock::ActivityClock;
use crate::deadline::IdleDeadline;
use crate::registry::SessionRegistry;
use crate::transport::{MessageSink, MessageStream, SessionTransport};

/// Session timing knobs.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Idle time after which a session is forcibly closed.
    pub idle_window: Duration,
    /// Period at which the inactivity monitor re-evaluates idle time.
    pub tick_interval: Duration,
    /// Idle time at which warnings start. Defaults to the tick interval,
    /// so a warning goes out on every tick once any idle time has accrued.
    pub warn_after: Duration,
    /// Depth of the per-session outbound frame queue.
    pub outbound_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_window: Duration::from_secs(10),
            tick_interval: Duration::from_secs(2),
            warn_after: Duration::from_secs(2),
            outbound_buffer: 32,
        }
    }
}

/// Why a session ended. Both causes take the same teardown path; the
/// distinction exists only for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The idle deadline fired with no reset.
    TimedOut,
    /// The peer disconnected, or a read/write failed.
    Closed,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimedOut => write!(f, "timed out"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// One client's connection lifecycle, from registration to teardown.
pub struct Session {
    id: ClientId,
    config: SessionConfig,
}

impl Session {
    pub fn new(id: ClientId, config: SessionConfig) -> Self {
        Self { id, config }
    }

    /// Drive the session to completion.
    ///
    /// Registers with `registry` (tearing down any prior session for the
    /// same id first), spawns the three tasks, and waits for the first
    /// terminal condition. Teardown stops the deadline, asserts the
    /// closed-signal, joins every task (the writer closes the transport
    /// on its way out), and unregisters.
    pub async fn run<T: SessionTransport>(
        self,
        transport: T,
        registry: Arc<SessionRegistry>,
    ) -> CloseReason {
        let Session { id, config } = self;

        let slot = registry.register(id).await;
        let closed = slot.closed.clone();
        info!("Client {id} connected");

        let clock = ActivityClock::new();
        let deadline = IdleDeadline::new(config.idle_window);

        let (sink, stream) = transport.split();
        let (frames_tx, frames_rx) = mpsc::channel::<ServerFrame>(config.outbound_buffer);

        let writer = tokio::spawn(outbound_writer(id, sink, frames_rx, closed.clone()));
        let inbound = tokio::spawn(inbound_loop(
            id,
            stream,
            clock.clone(),
            deadline.clone(),
            config.idle_window,
            frames_tx.clone(),
            closed.clone(),
        ));
        let monitor = tokio::spawn(inactivity_monitor(
            id,
            clock,
            config.clone(),
            frames_tx,
            closed.clone(),
        ));

        // The terminal race. The inbound loop's own termination asserts
        // the closed-signal, so all three exits converge here.
        let reason = tokio::select! {
            _ = deadline.expired() => CloseReason::TimedOut,
            _ = closed.cancelled() => CloseReason::Closed,
        };

        deadline.stop();
        closed.cancel();

        let _ = inbound.await;
        let _ = monitor.await;
        let _ = writer.await;

        registry.unregister(id, slot.instance);
        match reason {
            CloseReason::TimedOut => {
                info!(
                    "Client {id} timed out after {}s idle",
                    config.idle_window.as_secs()
                );
            }
            CloseReason::Closed => info!("Client {id} disconnected"),
        }
        reason
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session tasks
// ─────────────────────────────────────────────────────────────────────────────

/// Consume inbound messages. The only task that advances the activity
/// clock or re-arms the idle deadline. Every message is answered with
/// exactly one echo frame. Exits on transport end/error — asserting the
/// closed-signal — or on the closed-signal itself.
async fn inbound_loop<R: MessageStream>(
    id: ClientId,
    mut stream: R,
    clock: ActivityClock,
    deadline: IdleDeadline,
    idle_window: Duration,
    frames: mpsc::Sender<ServerFrame>,
    closed: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = closed.cancelled() => break,
            msg = stream.recv() => match msg {
                Some(Ok(payload)) => {
                    clock.touch();
                    deadline.reset(idle_window);
                    if frames.send(ServerFrame::echo(id, payload)).await.is_err() {
                        break;
                    }
                }
                Some(Err(e)) => {
                    warn!("Client {id}: {e}");
                    break;
                }
                None => {
                    debug!("Client {id} closed the connection");
                    break;
                }
            },
        }
    }
    closed.cancel();
}

/// Emit advisory idle warnings on a fixed tick. Read-only over the
/// clock — it never resets the deadline and never closes the transport.
/// Exits on the closed-signal or when the frame queue is gone.
async fn inactivity_monitor(
    id: ClientId,
    clock: ActivityClock,
    config: SessionConfig,
    frames: mpsc::Sender<ServerFrame>,
    closed: CancellationToken,
) {
    let first = tokio::time::Instant::now() + config.tick_interval;
    let mut ticks = tokio::time::interval_at(first, config.tick_interval);

    loop {
        tokio::select! {
            _ = closed.cancelled() => break,
            _ = ticks.tick() => {
                let idle = clock.idle_for();
                if idle >= config.warn_after {
                    let remaining = config.idle_window.saturating_sub(idle);
                    let warning = ServerFrame::idle_warning(id, idle, remaining);
                    if frames.send(warning).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// Drain the outbound frame queue into the sink. Exclusive owner of the
/// sink: transport closure happens exactly once, here, whichever task
/// requested it. A write failure asserts the closed-signal.
async fn outbound_writer<W: MessageSink>(
    id: ClientId,
    mut sink: W,
    mut frames: mpsc::Receiver<ServerFrame>,
    closed: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = closed.cancelled() => break,
            frame = frames.recv() => match frame {
                Some(frame) => {
                    if let Err(e) = sink.send(frame.to_text()).await {
                        warn!("Client {id}: {e}");
                        closed.cancel();
                        break;
                    }
                }
                None => break,
            },
        }
    }
    sink.close().await;
}
