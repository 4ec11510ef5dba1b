//! Chat request handlers.

use axum::Json;
use axum::extract::{Path, State};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{ChatRequest, ChatResponse, HistoryResponse};

/// `POST /api/chat` — run one chat turn, creating the session if needed.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let reply = state
        .chat
        .send(body.session_id.as_deref(), body.message)
        .await?;

    Ok(Json(ChatResponse {
        response: reply.reply,
        session_id: reply.session_id.to_string(),
    }))
}

/// `GET /api/chat/{session_id}` — full transcript and timestamps of a session.
pub async fn history_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<HistoryResponse>> {
    let session = state
        .chat
        .history(&session_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Session not found".into()))?;

    Ok(Json(HistoryResponse {
        session_id: session.id.to_string(),
        messages: session.turns,
        created_at: session.created_at.to_rfc3339(),
        updated_at: session.updated_at.to_rfc3339(),
    }))
}
