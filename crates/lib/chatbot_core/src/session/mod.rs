//! Conversation sessions and their persistence.
//!
//! A session is an identifier-keyed record holding the ordered turn list of
//! one conversation plus its creation and last-update timestamps. Storage is
//! abstracted behind [`SessionStore`] so handlers never see the backend.
//!
//! # Backends
//!
//! - [`postgres::PgSessionStore`] — `sessions` table, turns as one JSONB document
//! - [`memory::MemorySessionStore`] — in-process map for development and tests

pub mod memory;
pub mod postgres;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while reading or writing sessions.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Invalid session id '{0}'")]
    InvalidId(String),

    #[error("Session {0} no longer exists")]
    Missing(SessionId),
}

/// Store-assigned session identifier (UUIDv7, so ids sort by creation time).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for SessionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| StoreError::InvalidId(s.to_string()))
    }
}

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A stored conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    /// Append-only; order is conversational order.
    pub turns: Vec<Turn>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persistence for session records.
///
/// Implementations must be safe for concurrent use; one instance is shared
/// by every request.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a new empty session and return it with its assigned id.
    async fn create(&self) -> Result<Session, StoreError>;

    /// Look a session up by id. `Ok(None)` when it does not exist.
    async fn find(&self, id: &SessionId) -> Result<Option<Session>, StoreError>;

    /// Replace the stored turn list and refresh `updated_at`.
    ///
    /// Returns the new `updated_at`.
    async fn save_turns(
        &self,
        id: &SessionId,
        turns: &[Turn],
    ) -> Result<DateTime<Utc>, StoreError>;

    /// Cheap connectivity check.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_round_trips_through_display() {
        let id = SessionId::generate();
        let parsed: SessionId = id.to_string().parse().expect("parse");
        assert_eq!(parsed, id);
    }

    #[test]
    fn malformed_session_id_is_rejected() {
        let err = "nonexistent".parse::<SessionId>().unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(ref s) if s == "nonexistent"));
        assert_eq!(err.to_string(), "Invalid session id 'nonexistent'");
    }

    #[test]
    fn generated_ids_are_v7_and_ordered() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_eq!(a.as_uuid().get_version(), Some(uuid::Version::SortRand));
        assert!(b >= a);
    }

    #[test]
    fn turn_serializes_with_lowercase_role() {
        let json = serde_json::to_value(Turn::assistant("hello")).expect("serialize");
        assert_eq!(json, serde_json::json!({"role": "assistant", "content": "hello"}));

        let turn: Turn =
            serde_json::from_value(serde_json::json!({"role": "user", "content": "hi"}))
                .expect("deserialize");
        assert_eq!(turn, Turn::user("hi"));
    }
}
