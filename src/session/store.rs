//! Per-user session map with per-key exclusive access.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use crate::dialog::state::Session;

/// Exclusive handle on one user's session. Dropping it releases the user.
pub type SessionHandle = OwnedMutexGuard<Session>;

/// Sessions keyed by external user id.
///
/// Different users proceed concurrently; turns for the same user are
/// serialized. Entries are created lazily and kept for the life of the process.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the session for `user_id` and wait for exclusive access.
    ///
    /// The map shard lock is released before awaiting, so a slow turn never
    /// blocks other users.
    pub async fn acquire(&self, user_id: &str) -> SessionHandle {
        let slot = self
            .sessions
            .entry(user_id.to_string())
            .or_insert_with(|| {
                debug!(user_id, "Creating session");
                Arc::new(Mutex::new(Session::default()))
            })
            .clone();
        slot.lock_owned().await
    }

    /// Number of users seen since startup.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
