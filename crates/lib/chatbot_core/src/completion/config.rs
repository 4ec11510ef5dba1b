//! Completion provider configuration.
//!
//! Resolved from environment variables once at startup. The API key is
//! optional here: a missing key only fails when the first chat request
//! reaches the provider.

use std::env;
use std::time::Duration;

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default overall request timeout for one completion call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Resolved configuration for the completion provider.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// API key (`OPENAI_API_KEY`).
    pub api_key: Option<String>,
    /// Base URL without trailing slash; `/chat/completions` is appended.
    pub base_url: String,
    /// Model name sent with every request.
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CompletionConfig {
    /// Reads configuration from environment variables with defaults.
    ///
    /// | Variable                  | Default                     |
    /// |---------------------------|-----------------------------|
    /// | `OPENAI_API_KEY`          | unset                       |
    /// | `OPENAI_BASE_URL`         | `https://api.openai.com/v1` |
    /// | `OPENAI_MODEL`            | `gpt-3.5-turbo`             |
    /// | `COMPLETION_TIMEOUT_SECS` | `120`                       |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            base_url: env::var("OPENAI_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            model: env::var("OPENAI_MODEL").unwrap_or(defaults.model),
            timeout: env::var("COMPLETION_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}
