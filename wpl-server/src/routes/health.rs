use axum::{Json, Router, routing::get};
use wpl_core::sync::protocol::Ack;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health
async fn health() -> Json<Ack> {
    Json(Ack { ok: true })
}
