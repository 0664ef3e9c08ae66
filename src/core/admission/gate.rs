//! Sliding-window rate gate with cooldown

use super::types::{AdmissionError, UserId};
use crate::config::AdmissionConfig;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Per-user admission history.
#[derive(Debug, Default)]
struct RateState {
    /// Timestamp of the last *allowed* request
    last_seen_at: Option<Instant>,
    /// Timestamps of allowed requests, oldest first; pruned lazily on check
    window_hits: VecDeque<Instant>,
}

/// Per-user sliding-window + cooldown admission check.
///
/// Pure function of per-user history, no I/O, no blocking. A denied check
/// leaves the user's state untouched, so hammering a denied request does not
/// consume budget; an allowed check records the hit atomically under the
/// same map guard.
pub struct RateGate {
    config: AdmissionConfig,
    states: DashMap<UserId, RateState>,
}

impl RateGate {
    /// Create a new rate gate with the given policy.
    pub fn new(config: AdmissionConfig) -> Self {
        Self {
            config,
            states: DashMap::new(),
        }
    }

    /// Check whether `user` may proceed right now, recording the hit if so.
    pub fn check(&self, user: UserId) -> Result<(), AdmissionError> {
        let now = Instant::now();
        let window = self.config.window();
        let cooldown = self.config.cooldown();

        let mut state = self.states.entry(user).or_default();

        // Cooldown comes first: it applies regardless of window occupancy.
        if let Some(last) = state.last_seen_at {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < cooldown {
                let retry_after = cooldown - elapsed;
                debug!(user, retry_in = retry_after.as_secs(), "cooldown active");
                return Err(AdmissionError::RateLimited { retry_after });
            }
        }

        // Prune hits older than the window.
        while let Some(&oldest) = state.window_hits.front() {
            if now.saturating_duration_since(oldest) > window {
                state.window_hits.pop_front();
            } else {
                break;
            }
        }

        if state.window_hits.len() >= self.config.max_per_window as usize {
            // The oldest surviving hit determines when a slot frees up.
            let retry_after = state
                .window_hits
                .front()
                .map(|&oldest| window.saturating_sub(now.saturating_duration_since(oldest)))
                .unwrap_or(window);
            debug!(
                user,
                hits = state.window_hits.len(),
                limit = self.config.max_per_window,
                "rate window exhausted"
            );
            return Err(AdmissionError::RateLimited {
                retry_after: retry_after.max(Duration::from_secs(1)),
            });
        }

        state.window_hits.push_back(now);
        state.last_seen_at = Some(now);
        Ok(())
    }

    /// Number of hits currently recorded for `user` (pruned or not).
    #[cfg(test)]
    pub(crate) fn recorded_hits(&self, user: UserId) -> usize {
        self.states
            .get(&user)
            .map(|s| s.window_hits.len())
            .unwrap_or(0)
    }
}
