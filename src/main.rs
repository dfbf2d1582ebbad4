//! Vigil — session-liveness WebSocket server.
//!
//! Clients connect to `/ws?userId=N` (N in 1–10) and get every message
//! echoed back. A session that stays quiet receives periodic inactivity
//! warnings and is forcibly closed once the idle window elapses. Plain
//! HTTP requests are served from the static root.
//!
//! Usage:
//!   vigil                        # Default port 8080, serve ./
//!   vigil --port 9000            # Custom port
//!   vigil --root ./public        # Custom static root
//!   vigil --idle-window 30       # Close after 30s idle

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use vigil_session::SessionConfig;
use vigil_transport::{TransportConfig, TransportServer};

#[derive(Parser, Debug)]
#[command(name = "vigil", about = "Vigil — session-liveness WebSocket server")]
struct Cli {
    /// Port to listen on (0 for OS-assigned)
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Hostname to bind to
    #[arg(long, default_value = "127.0.0.1")]
    hostname: String,

    /// Directory to serve for plain HTTP requests
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Seconds of idle time before a session is forcibly closed
    #[arg(long, default_value = "10")]
    idle_window: u64,

    /// Seconds between inactivity checks
    #[arg(long, default_value = "2")]
    tick_interval: u64,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let tick_interval = Duration::from_secs(cli.tick_interval);
    let session = SessionConfig {
        idle_window: Duration::from_secs(cli.idle_window),
        tick_interval,
        warn_after: tick_interval,
        ..SessionConfig::default()
    };

    let config = TransportConfig {
        port: cli.port,
        hostname: cli.hostname.clone(),
        static_root: cli.root.clone(),
        session,
    };

    let mut transport = match TransportServer::start(config).await {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to start transport: {e}");
            std::process::exit(1);
        }
    };

    println!();
    println!("  Vigil is running");
    println!();
    println!("  WebSocket endpoint:");
    println!(
        "    ws://{}:{}/ws?userId=<1-10>",
        cli.hostname,
        transport.port()
    );
    println!();
    println!("  Static root:  {}", cli.root.display());
    println!(
        "  Idle window:  {}s (inactivity check every {}s)",
        cli.idle_window, cli.tick_interval
    );
    println!();
    println!("  Press Ctrl+C to stop.");
    println!();

    let _ = tokio::signal::ctrl_c().await;

    println!();
    println!("  Shutting down...");
    transport.stop().await;
    println!("  Server stopped.");
}
