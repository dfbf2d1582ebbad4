//! HTTP/WebSocket transport server using Axum.
//!
//! Validates the client identifier before upgrading — a rejected request
//! never creates a session — then hands the accepted socket to the
//! session supervisor. Everything else the server does (static files,
//! health) is stateless plumbing around the registry.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tower_http::services::ServeDir;
use tracing::{info, warn};
use vigil_protocol::ClientId;
use vigil_session::{Session, SessionConfig, SessionRegistry};

use crate::ws::WsTransport;

/// Transport server configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Port to listen on (0 for OS-assigned)
    pub port: u16,
    /// Hostname to bind to
    pub hostname: String,
    /// Directory served for plain HTTP requests
    pub static_root: PathBuf,
    /// Per-session timing
    pub session: SessionConfig,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            hostname: "127.0.0.1".into(),
            static_root: ".".into(),
            session: SessionConfig::default(),
        }
    }
}

/// Shared state for the transport server.
struct AppState {
    registry: Arc<SessionRegistry>,
    config: TransportConfig,
}

/// The transport server — accepts upgrades and hands each connection to
/// a session supervisor.
pub struct TransportServer {
    registry: Arc<SessionRegistry>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
    port: u16,
}

impl TransportServer {
    /// Start the transport server with the given configuration.
    pub async fn start(config: TransportConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);

        let registry = Arc::new(SessionRegistry::new());
        let state = Arc::new(AppState {
            registry: registry.clone(),
            config: config.clone(),
        });

        let app = Router::new()
            .route("/ws", get(ws_upgrade_handler))
            .route("/health", get(health_handler))
            .fallback_service(ServeDir::new(&config.static_root))
            .with_state(state);

        let addr: SocketAddr = format!("{}:{}", config.hostname, config.port).parse()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let actual_port = listener.local_addr()?.port();

        info!(
            "Vigil listening on ws://{}:{}/ws (static root: {})",
            config.hostname,
            actual_port,
            config.static_root.display()
        );

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.recv().await;
                })
                .await
                .ok();
        });

        Ok(Self {
            registry,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
            port: actual_port,
        })
    }

    /// The live session registry, for diagnostics.
    pub fn registry(&self) -> Arc<SessionRegistry> {
        self.registry.clone()
    }

    /// Get the actual bound port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Gracefully stop the server, closing every live session first.
    pub async fn stop(&mut self) {
        self.registry.close_all();
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        info!("Vigil transport server stopped");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP Handlers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ConnectParams {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

async fn ws_upgrade_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let client = match ClientId::from_param(params.user_id.as_deref()) {
        Ok(client) => client,
        Err(e) => {
            warn!("Connection rejected: {e}");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let registry = state.registry.clone();
    let config = state.config.session.clone();
    ws.on_upgrade(move |socket| async move {
        let session = Session::new(client, config);
        session.run(WsTransport::new(socket), registry).await;
    })
    .into_response()
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "sessions": state.registry.len(),
        "clients": state.registry.client_ids(),
    }))
}
