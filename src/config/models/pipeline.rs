//! Acquisition pipeline configuration

use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Budgets for a single acquisition: artifact size cap, outer timeout, and
/// the preferred video height the format ladder is built around.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum artifact size in megabytes
    #[serde(default = "default_max_artifact_mb")]
    pub max_artifact_mb: u64,
    /// Outer timeout for one acquisition call, in seconds, regardless of how
    /// many format candidates are tried
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    /// Preferred maximum video height for ladder construction
    #[serde(default = "default_prefer_height")]
    pub prefer_height: u32,
}

impl PipelineConfig {
    /// Maximum artifact size in bytes
    pub fn max_artifact_bytes(&self) -> u64 {
        self.max_artifact_mb * 1024 * 1024
    }

    /// Outer acquisition timeout
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Validate the pipeline budgets
    pub fn validate(&self) -> Result<()> {
        if self.max_artifact_mb == 0 {
            return Err(GatewayError::Config(
                "pipeline.max_artifact_mb must be greater than zero".into(),
            ));
        }
        if self.acquire_timeout_secs == 0 {
            return Err(GatewayError::Config(
                "pipeline.acquire_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_artifact_mb: default_max_artifact_mb(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
            prefer_height: default_prefer_height(),
        }
    }
}

fn default_max_artifact_mb() -> u64 {
    48
}

fn default_acquire_timeout_secs() -> u64 {
    180
}

fn default_prefer_height() -> u32 {
    1080
}
