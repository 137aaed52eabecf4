//! Router assembly: the game socket, the read-only API, the SPA, and the
//! cross-cutting layers (CORS, HTTP tracing).

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

const STATIC_DIR: &str = "./static";

/// Endpoints mounted under `/api/v1`.
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(http::http_health))
        .route("/games", get(http::http_get_games))
        .route("/progress", get(http::http_get_progress))
        .route("/number_words", post(http::http_post_number_words))
}

/// `/ws` carries the game session; everything under `/api/v1` is stateless
/// reads plus number conversion; anything else falls through to the SPA.
pub fn build_router(state: Arc<AppState>) -> Router {
    let spa = ServeDir::new(STATIC_DIR)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(format!("{STATIC_DIR}/index.html")));

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/ws", get(ws::ws_upgrade))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(cors)
        .layer(trace)
        .fallback_service(spa)
}
