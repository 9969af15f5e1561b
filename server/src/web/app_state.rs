use std::sync::Arc;

use crate::engine::relay::Relay;

/// Shared state handed to every HTTP handler.
pub struct AppState {
    pub relay: Arc<Relay>,
}
