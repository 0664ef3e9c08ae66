//! Duplicate-inflight registry
//!
//! Tracks which `(user, key)` acquisitions are currently running. A second
//! identical request is rejected outright — not queued, not retried — while
//! the first is in flight. Entries are removed by the guard's `Drop`, which
//! runs on every exit path (success, failure, panic, cancellation), so a
//! crashed acquisition can never leave its key permanently blocked.

use super::types::{AdmissionError, RequestKey, UserId};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
struct InflightEntry {
    started_at: Instant,
}

/// Registry of running acquisitions keyed by `(user, key)`.
///
/// The key scope is per pair: two different users requesting the same URL
/// run independently.
#[derive(Clone, Default)]
pub struct InflightRegistry {
    entries: Arc<DashMap<(UserId, RequestKey), InflightEntry>>,
}

impl InflightRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically register `(user, key)`, or fail if it is already running.
    ///
    /// The registration lives until the returned guard is dropped.
    pub fn try_register(
        &self,
        user: UserId,
        key: &RequestKey,
    ) -> Result<InflightGuard, AdmissionError> {
        match self.entries.entry((user, key.clone())) {
            Entry::Occupied(_) => Err(AdmissionError::DuplicateInFlight),
            Entry::Vacant(vacant) => {
                vacant.insert(InflightEntry {
                    started_at: Instant::now(),
                });
                Ok(InflightGuard {
                    entries: Arc::clone(&self.entries),
                    user,
                    key: key.clone(),
                })
            }
        }
    }

    /// When the `(user, key)` acquisition started, if one is running.
    pub fn started_at(&self, user: UserId, key: &RequestKey) -> Option<Instant> {
        self.entries
            .get(&(user, key.clone()))
            .map(|e| e.started_at)
    }

    /// Number of acquisitions currently in flight across all users.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Removes the inflight entry on drop.
pub struct InflightGuard {
    entries: Arc<DashMap<(UserId, RequestKey), InflightEntry>>,
    user: UserId,
    key: RequestKey,
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.entries.remove(&(self.user, self.key.clone()));
    }
}
