//! API server configuration.

use chatbot_core::completion::config::CompletionConfig;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:8000").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Allowed CORS origins. Empty mirrors any origin.
    pub cors_allowed_origins: Vec<String>,
    /// Completion provider settings.
    pub completion: CompletionConfig,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable               | Default                               |
    /// |------------------------|---------------------------------------|
    /// | `BIND_ADDR`            | `0.0.0.0:8000`                        |
    /// | `DATABASE_URL`         | `postgres://localhost:5432/chatbot`   |
    /// | `CORS_ALLOWED_ORIGINS` | empty (any origin)                    |
    /// | `OPENAI_*`             | see [`CompletionConfig::from_env`]    |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/chatbot".into()),
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
            completion: CompletionConfig::from_env(),
        }
    }
}

/// Split a comma-separated origin list, dropping blanks and `*`.
///
/// `*` means "any origin", which is what an empty list already does.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty() && *o != "*")
        .map(|o| o.trim_end_matches('/').to_string())
        .collect()
}
