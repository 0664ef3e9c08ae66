//! Admission control configuration

use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Admission control policy: rate gate plus per-user queue.
///
/// The defaults mirror a conservative chat-bot policy: 3 requests per 20 s
/// window, 5 s between requests, and at most 2 requests queued per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Sliding window duration in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Maximum allowed requests per window
    #[serde(default = "default_max_per_window")]
    pub max_per_window: u32,
    /// Minimum interval between two requests from the same user, in seconds
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    /// Maximum pending requests per user (the executing one included)
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
}

impl AdmissionConfig {
    /// Sliding window duration
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Cooldown duration
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    /// Validate the admission policy
    pub fn validate(&self) -> Result<()> {
        if self.window_secs == 0 {
            return Err(GatewayError::Config(
                "admission.window_secs must be greater than zero".into(),
            ));
        }
        if self.max_per_window == 0 {
            return Err(GatewayError::Config(
                "admission.max_per_window must be greater than zero".into(),
            ));
        }
        if self.queue_depth == 0 {
            return Err(GatewayError::Config(
                "admission.queue_depth must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_per_window: default_max_per_window(),
            cooldown_secs: default_cooldown_secs(),
            queue_depth: default_queue_depth(),
        }
    }
}

fn default_window_secs() -> u64 {
    20
}

fn default_max_per_window() -> u32 {
    3
}

fn default_cooldown_secs() -> u64 {
    5
}

fn default_queue_depth() -> usize {
    2
}
