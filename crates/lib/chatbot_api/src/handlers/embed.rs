//! Embed snippet endpoint.

use axum::Json;
use axum::extract::Query;

use crate::models::{EmbedQuery, EmbedResponse};

/// `GET /api/embed` — iframe markup pointing at `{website_url}/chatbot`.
pub async fn embed_handler(Query(params): Query<EmbedQuery>) -> Json<EmbedResponse> {
    Json(EmbedResponse {
        embed_code: chatbot_core::embed::embed_code(&params.website_url),
    })
}
