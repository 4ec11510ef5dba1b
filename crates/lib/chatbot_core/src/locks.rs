//! Per-session serialization.
//!
//! A chat turn is read-modify-write on the session's turn list. Two requests
//! against the same session must not interleave inside that window, or the
//! later write drops the other's turns. [`SessionLocks`] hands out one async
//! mutex per session id; entries are removed once nobody holds or waits on
//! them.
//!
//! This only serializes requests within one process. Several server
//! processes sharing a database still race last-writer-wins.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::session::SessionId;

/// Registry of per-session locks. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct SessionLocks {
    inner: Arc<DashMap<SessionId, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`. Released when the guard drops.
    ///
    /// Cancel-safe: dropping the future while it waits still removes the
    /// entry if nobody else holds or waits on it.
    pub async fn acquire(&self, id: SessionId) -> SessionGuard {
        let mut waiting = Waiting {
            locks: self,
            id,
            armed: true,
        };
        // Clone the Arc out so the shard lock is released before awaiting.
        let mutex = self.inner.entry(id).or_default().clone();
        let guard = mutex.lock_owned().await;
        waiting.armed = false;
        SessionGuard {
            locks: self.clone(),
            id,
            guard: Some(guard),
        }
    }

    /// Number of sessions with a live lock entry.
    pub fn active(&self) -> usize {
        self.inner.len()
    }

    fn release(&self, id: &SessionId) {
        // Only the map's own reference left: no holder, no waiter.
        self.inner.remove_if(id, |_, m| Arc::strong_count(m) == 1);
    }
}

/// Cleanup for an `acquire` dropped before it got the lock.
///
/// Declared ahead of the pending lock future, so that future (and its
/// `Arc`) is dropped first.
struct Waiting<'a> {
    locks: &'a SessionLocks,
    id: SessionId,
    armed: bool,
}

impl Drop for Waiting<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.locks.release(&self.id);
        }
    }
}

/// Exclusive access to one session.
#[derive(Debug)]
pub struct SessionGuard {
    locks: SessionLocks,
    id: SessionId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks.release(&self.id);
    }
}
