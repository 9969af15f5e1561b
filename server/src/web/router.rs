use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use super::app_state::AppState;
use super::rest_api;
use super::webhook::{self, MAX_WEBHOOK_BODY_BYTES};
use crate::config::RelayMode;

/// Build the axum router. The webhook route only exists in webhook mode.
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut router: Router<Arc<AppState>> = Router::new()
        .route("/", get(rest_api::health))
        .route("/status", get(rest_api::status));

    if state.relay.mode() == RelayMode::Webhook {
        router = router.route(
            "/webhook",
            post(webhook::receive_webhook).layer(DefaultBodyLimit::max(MAX_WEBHOOK_BODY_BYTES)),
        );
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
