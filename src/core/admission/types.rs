//! Admission types and errors

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Opaque integer identity of a requester, stable for the process lifetime.
pub type UserId = i64;

/// Normalized string identifying *what* is being requested, typically a
/// canonical URL. Combined with [`UserId`] it forms the inflight-dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey(String);

impl RequestKey {
    /// Wrap an already-normalized request string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The underlying string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RequestKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Deliberate backpressure signals from admission control.
///
/// None of these are transient faults: the caller surfaces them to the user
/// and must not retry on their behalf.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    /// Too many requests; retry once `retry_after` has elapsed.
    #[error("rate limited, retry in {}s", retry_after.as_secs())]
    RateLimited {
        /// Time until the cooldown or window frees up
        retry_after: Duration,
    },

    /// The per-user pending queue is full.
    #[error("too many queued requests")]
    QueueOverflow,

    /// The same (user, key) acquisition is already running.
    #[error("request already in progress")]
    DuplicateInFlight,
}
