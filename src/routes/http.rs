//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs basic result info.

use std::sync::Arc;
use axum::{extract::State, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::protocol::*;
use crate::state::AppState;
use crate::logic::*;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_games(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(GamesOut { games: game_catalog(&state.corpus) })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_progress(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let records = progress_snapshot(&state).await;
  info!(target: "vocab_drill", games = records.len(), "HTTP progress served");
  Json(ProgressOut { records })
}

#[instrument(level = "info", skip(body), fields(value = body.value))]
pub async fn http_post_number_words(Json(body): Json<NumberWordsIn>) -> impl IntoResponse {
  let words = number_words(body.value);
  Json(NumberWordsOut { value: body.value, words })
}
