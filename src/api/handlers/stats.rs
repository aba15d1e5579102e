//! Lobby statistics endpoint.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::StatsResponse;
use crate::app_state::AppState;

/// `GET /stats` — Current connection and queue counters.
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    tag = "Lobby",
    summary = "Lobby counters",
    description = "Returns the number of live connections and the length of every waiting queue.",
    responses(
        (status = 200, description = "Current counters", body = StatsResponse),
    )
)]
pub async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(StatsResponse::from(state.engine.stats().await))
}

/// Statistics routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/stats", get(stats_handler))
}
