//! Vocabulary Drill · Game Backend
//!
//! - Axum HTTP + WebSocket API; the game session runs over `/ws`
//! - Sixteen drill types with level progression and medals, persisted to disk
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT              : u16 (default 3000)
//!   GAME_CONFIG_PATH  : path to TOML config (rules, storage dir, corpus overrides)
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod seeds;
mod corpus;
mod numwords;
mod generator;
mod engine;
mod store;
mod progression;
mod scheduler;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn, instrument};

use crate::config::{load_game_config_from_env, GameConfig};
use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let cfg = load_game_config_from_env().unwrap_or_else(|| {
    info!(target: "vocab_drill", "Using built-in game config");
    GameConfig::default()
  });

  // Validates the corpus and loads saved progress; a bad corpus stops startup.
  let state = Arc::new(AppState::new(&cfg)?);

  // Countdown ticks and display delays fire here, whichever tab is open.
  tokio::spawn(logic::run_timers(state.clone()));

  let app = build_router(state.clone());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "vocab_drill", %addr, max_levels = state.rules.max_levels, "HTTP server listening");
  axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

  // Sessions end with their sockets; a final save covers anything still dirty.
  if let Err(e) = state.controller.lock().await.save() {
    warn!(target: "vocab_drill", error = %e, "Final progress save failed");
  }
  info!(target: "vocab_drill", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!(target: "vocab_drill", error = %e, "Failed to listen for Ctrl-C");
    std::future::pending::<()>().await;
  }
  info!(target: "vocab_drill", "Shutdown requested");
}
