//! Health endpoint — version and store connectivity.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::AppState;
use crate::models::HealthResponse;

/// `GET /api/health` — reports the core version and whether the store answers.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_connected = match state.chat.store().ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!("session store ping failed: {e}");
            false
        }
    };

    Json(HealthResponse {
        version: chatbot_core::version().to_string(),
        store_connected,
    })
}
