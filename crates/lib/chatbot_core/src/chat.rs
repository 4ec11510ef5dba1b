//! Chat turn flow.
//!
//! [`ChatService`] composes a [`SessionStore`] and a [`CompletionProvider`]:
//! load or create the session, append the user turn, ask the provider for a
//! reply with the full history, append the reply and persist. Nothing is
//! written back if the provider call fails.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::completion::{CHAT_GENERATION, CompletionError, CompletionProvider, GenerationParams};
use crate::locks::SessionLocks;
use crate::session::{Session, SessionId, SessionStore, StoreError, Turn};

/// Errors that can occur during a chat turn.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

/// Outcome of a successful chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub session_id: SessionId,
    pub reply: String,
}

/// Shared chat entry point. Cheap to clone; all clones share the same store,
/// provider and lock registry.
#[derive(Clone)]
pub struct ChatService {
    store: Arc<dyn SessionStore>,
    provider: Arc<dyn CompletionProvider>,
    locks: SessionLocks,
    params: GenerationParams,
}

impl ChatService {
    pub fn new(store: Arc<dyn SessionStore>, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            store,
            provider,
            locks: SessionLocks::new(),
            params: CHAT_GENERATION,
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Run one chat turn.
    ///
    /// `session_id` that is absent, malformed, or unknown starts a new
    /// session. Store and provider failures abort the turn.
    pub async fn send(
        &self,
        session_id: Option<&str>,
        message: String,
    ) -> Result<ChatReply, ChatError> {
        let requested = session_id.and_then(|raw| match raw.parse::<SessionId>() {
            Ok(id) => Some(id),
            Err(e) => {
                debug!(error = %e, "ignoring unparseable session id");
                None
            }
        });

        // Held until the updated turn list is written.
        let _guard = match requested {
            Some(id) => Some(self.locks.acquire(id).await),
            None => None,
        };

        let session = self.load_or_create(requested).await?;

        let mut turns = session.turns;
        turns.push(Turn::user(message));

        let reply = self.provider.complete(&turns, &self.params).await?;

        turns.push(Turn::assistant(reply.clone()));
        self.store.save_turns(&session.id, &turns).await?;

        info!(session_id = %session.id, turns = turns.len(), "chat turn completed");

        Ok(ChatReply {
            session_id: session.id,
            reply,
        })
    }

    /// Fetch a session for history display.
    ///
    /// Malformed ids are an error; unknown ids are `Ok(None)`.
    pub async fn history(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        let id: SessionId = session_id.parse()?;
        self.store.find(&id).await
    }

    async fn load_or_create(&self, requested: Option<SessionId>) -> Result<Session, StoreError> {
        if let Some(id) = requested
            && let Some(session) = self.store.find(&id).await?
        {
            return Ok(session);
        }

        let session = self.store.create().await?;
        info!(session_id = %session.id, "created session");
        Ok(session)
    }
}
