use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

use super::app_state::AppState;
use crate::engine::events::{LifecycleEvent, WebhookPayload};

/// Largest accepted webhook body.
pub const MAX_WEBHOOK_BODY_BYTES: usize = 64 * 1024;

fn bad_request(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": message})),
    )
        .into_response()
}

/// POST /webhook: fold a Photon lifecycle event into membership.
///
/// The body is decoded by hand so that every malformed request gets a 400
/// with a JSON error and leaves state untouched.
pub async fn receive_webhook(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "rejected malformed webhook body");
            return bad_request(format!("Invalid webhook body: {e}"));
        }
    };

    let event = match LifecycleEvent::from_payload(payload) {
        Ok(ev) => ev,
        Err(e) => {
            warn!(error = %e, "rejected invalid webhook event");
            return bad_request(e);
        }
    };

    let kind = event.kind();
    let decision = state.relay.apply_event(event).await;
    info!(event = kind, sent = decision.is_send(), "webhook event applied");

    Json(serde_json::json!({"ResultCode": 0})).into_response()
}
