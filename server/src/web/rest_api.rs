use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

use super::app_state::AppState;

pub const HEALTH_BODY: &str = "✅ Player Count Bot Running";

/// GET /, the liveness probe.
pub async fn health() -> &'static str {
    HEALTH_BODY
}

/// GET /status: last observed snapshot, armed thresholds and membership.
pub async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.relay.status())
}
