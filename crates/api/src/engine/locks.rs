//! Keyed per-user mutual exclusion.
//!
//! Session state transitions for one user must be serialized, but users
//! are fully independent, so this is a lock table keyed by user id rather
//! than a process-wide lock. Locks are held only for the duration of a
//! state transition, never across an analysis provider call.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use speakcoach_core::types::DbId;

#[derive(Default)]
pub struct UserLocks {
    inner: Mutex<HashMap<DbId, Arc<tokio::sync::Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the lock for one user.
    ///
    /// TODO: sweep entries whose Arc strong count has dropped to 1 so the
    /// table does not grow with every user ever seen.
    pub fn for_user(&self, user_id: DbId) -> Arc<tokio::sync::Mutex<()>> {
        let mut table = self.inner.lock().expect("user lock table poisoned");
        Arc::clone(table.entry(user_id).or_default())
    }
}
