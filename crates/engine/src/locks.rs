//! Per-user mutual exclusion.
//!
//! Each user gets an async mutex, created on first use. Holding a
//! [`UserGuard`] serialises all progression operations for that user;
//! different users never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use nutriquest_core::types::DbId;
use tokio::sync::OwnedMutexGuard;

/// Once the table grows past this many entries, idle entries are pruned on
/// the next acquire.
const PRUNE_THRESHOLD: usize = 1024;

/// Lock table keyed by user ID.
#[derive(Default)]
pub struct UserLocks {
    locks: Mutex<HashMap<DbId, Arc<tokio::sync::Mutex<()>>>>,
}

/// Proof that the holder owns a user's lock. Released on drop.
pub struct UserGuard {
    user_id: DbId,
    _guard: OwnedMutexGuard<()>,
}

impl UserGuard {
    pub fn user_id(&self) -> DbId {
        self.user_id
    }
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for and take the lock for `user_id`.
    pub async fn acquire(&self, user_id: DbId) -> UserGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            if locks.len() > PRUNE_THRESHOLD {
                // Entries only referenced by the table are not held or awaited.
                locks.retain(|_, m| Arc::strong_count(m) > 1);
            }
            Arc::clone(locks.entry(user_id).or_default())
        };

        UserGuard {
            user_id,
            _guard: lock.lock_owned().await,
        }
    }

    /// Number of users currently tracked in the table.
    pub fn tracked_users(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
