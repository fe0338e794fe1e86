//! AI Interview Game · Backend
//!
//! - Axum HTTP + WebSocket API over a per-session question/answer/progression game
//! - Questions and evaluations come from an OpenAI-compatible chat endpoint
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT               : u16 (default 3000)
//!   GEMINI_API_KEY     : required; startup halts without it
//!   MODEL_BASE_URL     : default Gemini's OpenAI-compatible endpoint
//!   MODEL_NAME         : default "gemini-2.5-flash"
//!   MODEL_TIMEOUT_SECS : default 30
//!   GAME_CONFIG_PATH   : path to TOML config (prompt overrides)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

mod telemetry;
mod util;
mod error;
mod domain;
mod config;
mod session;
mod progression;
mod state;
mod protocol;
mod logic;
mod openai;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::{load_game_config_from_env, ModelSettings};
use crate::openai::OpenAI;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let settings = match ModelSettings::from_env() {
    Ok(s) => s,
    Err(e) => {
      error!(target: "interview_game", error = %e, "Startup aborted");
      eprintln!("❌ {}", e);
      return Err(e.into());
    }
  };
  let prompts = load_game_config_from_env().map(|c| c.prompts).unwrap_or_default();

  let client = OpenAI::new(settings, prompts)?;
  info!(target: "interview_game", base_url = %client.base_url, model = %client.model, "Model client ready");

  let state = Arc::new(AppState::new(Arc::new(client)));
  let app = build_router(state);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "interview_game", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
