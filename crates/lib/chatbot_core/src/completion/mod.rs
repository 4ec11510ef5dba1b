//! Completion module — turns a conversation into the assistant's next reply.
//!
//! The provider is a black box: an ordered list of role/content turns goes
//! in, generated text comes out. [`CompletionProvider`] is the seam;
//! [`openai::OpenAiCompletion`] talks to any OpenAI-compatible
//! `/chat/completions` endpoint.
//!
//! There is no retry. A failed call surfaces immediately as a
//! [`CompletionError`].

pub mod config;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

use crate::session::Turn;

/// Errors that can occur while requesting a completion.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("OPENAI_API_KEY is required for the completion provider")]
    MissingApiKey,

    #[error("Completion request failed: {0}")]
    Request(String),

    #[error("Completion request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Non-success status from the provider (includes content-policy rejections).
    #[error("Completion provider returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Completion response parse error: {0}")]
    InvalidResponse(String),

    #[error("Completion provider returned no reply")]
    EmptyReply,
}

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

/// Fixed generation settings for chat turns. Not caller-configurable.
pub const CHAT_GENERATION: GenerationParams = GenerationParams {
    temperature: 0.7,
    max_tokens: 150,
    top_p: 1.0,
    frequency_penalty: 0.0,
    presence_penalty: 0.0,
};

/// A language-model completion backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate the next assistant message for `turns`, oldest first.
    async fn complete(
        &self,
        turns: &[Turn],
        params: &GenerationParams,
    ) -> Result<String, CompletionError>;
}
