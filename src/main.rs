//! BrainPlay · Kids Mini-Game Backend
//!
//! - Axum HTTP + WebSocket API
//! - Optional JSON file persistence for profile, settings and session history
//!
//! Important env variables:
//!   PORT              : u16 (default 3000)
//!   GAMES_CONFIG_PATH : path to TOML games config (rounds, generator bounds)
//!   STORE_PATH        : JSON file for persisted state (memory only when unset)
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use brainplay::routes::build_router;
use brainplay::state::AppState;
use brainplay::telemetry;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let state = Arc::new(AppState::new());
  let app = build_router(state);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "brainplay_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "brainplay_backend", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "brainplay_backend", error = %e, "Failed to listen for ctrl-c");
  }
}
