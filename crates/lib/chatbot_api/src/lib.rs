//! # chatbot_api
//!
//! HTTP API library for the chatbot.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use chatbot_core::chat::ChatService;
use chatbot_core::completion::CompletionProvider;
use chatbot_core::session::SessionStore;
use sqlx::PgPool;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ApiConfig;
use crate::handlers::{chat, embed, health};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Chat flow over the shared session store and completion provider.
    pub chat: ChatService,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn SessionStore>,
        provider: Arc<dyn CompletionProvider>,
        config: ApiConfig,
    ) -> Self {
        Self {
            chat: ChatService::new(store, provider),
            config,
        }
    }
}

/// Run embedded database migrations.
///
/// Delegates to `chatbot_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    chatbot_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .route(routes::POST_API_CHAT, post(chat::chat_handler))
        .route(routes::GET_API_CHAT_SESSION_ID, get(chat::history_handler))
        .route(routes::GET_API_EMBED, get(embed::embed_handler))
        .route(routes::GET_API_HEALTH, get(health::health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS policy. An empty origin list mirrors any origin, with credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    if origins.is_empty() {
        return layer.allow_origin(AllowOrigin::mirror_request());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}
