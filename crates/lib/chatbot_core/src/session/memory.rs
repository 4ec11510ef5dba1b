//! In-process session store.
//!
//! Keeps sessions in a concurrent map. Nothing survives a restart; used for
//! local development (`--memory-store`) and as the backing store of test
//! doubles.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::{Session, SessionId, SessionStore, StoreError, Turn};

/// [`SessionStore`] held entirely in memory.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: DashMap<SessionId, Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self) -> Result<Session, StoreError> {
        let now = Utc::now();
        let session = Session {
            id: SessionId::generate(),
            turns: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.get(id).map(|s| s.value().clone()))
    }

    async fn save_turns(
        &self,
        id: &SessionId,
        turns: &[Turn],
    ) -> Result<DateTime<Utc>, StoreError> {
        let mut session = self.sessions.get_mut(id).ok_or(StoreError::Missing(*id))?;
        session.turns = turns.to_vec();
        session.updated_at = Utc::now();
        Ok(session.updated_at)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
