//! Per-user execution locks

use super::types::UserId;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-user mutual exclusion around the admit → acquire → deliver → cache
/// sequence. The queue bounds how many requests a user may have *pending*;
/// this lock bounds *execution* to one acquisition at a time.
///
/// Locks for unrelated users are independent; there is no global mutex.
#[derive(Default)]
pub struct UserLocks {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl UserLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire `user`'s lock, suspending until the previous holder releases.
    ///
    /// The returned owned guard releases on drop, on every exit path.
    pub async fn acquire(&self, user: UserId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(user)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Attempt to take the lock without waiting. Used by tests to observe
    /// whether a user is currently executing.
    pub fn is_locked(&self, user: UserId) -> bool {
        self.locks
            .get(&user)
            .map(|l| l.try_lock().is_err())
            .unwrap_or(false)
    }
}
