//! Configuration management
//!
//! This module handles loading and validation of all gateway configuration.
//! Policy knobs (rate window, queue depth, size/time budgets) are injected
//! here, never hard-coded in the components that enforce them.

pub mod models;

pub use models::{AdmissionConfig, DatabaseConfig, PipelineConfig};

use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the gateway core
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Admission control policy (rate gate + queue)
    #[serde(default)]
    pub admission: AdmissionConfig,
    /// Acquisition pipeline budgets
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Durable store settings
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Config {
    /// Load configuration from a YAML file, then apply environment overrides.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GatewayError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config: Config = serde_yaml::from_str(&content)
            .map_err(|e| GatewayError::Config(format!("Failed to parse config: {}", e)))?;

        config.apply_env_overrides()?;
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Build configuration from defaults plus environment variables only.
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `MEDIAGATE_*` / `DATABASE_URL` environment overrides in place.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(window) = env::var("MEDIAGATE_WINDOW_SECS") {
            self.admission.window_secs = parse_env("MEDIAGATE_WINDOW_SECS", &window)?;
        }
        if let Ok(max) = env::var("MEDIAGATE_MAX_PER_WINDOW") {
            self.admission.max_per_window = parse_env("MEDIAGATE_MAX_PER_WINDOW", &max)?;
        }
        if let Ok(cooldown) = env::var("MEDIAGATE_COOLDOWN_SECS") {
            self.admission.cooldown_secs = parse_env("MEDIAGATE_COOLDOWN_SECS", &cooldown)?;
        }
        if let Ok(depth) = env::var("MEDIAGATE_QUEUE_DEPTH") {
            self.admission.queue_depth = parse_env("MEDIAGATE_QUEUE_DEPTH", &depth)?;
        }
        if let Ok(max_mb) = env::var("MEDIAGATE_MAX_ARTIFACT_MB") {
            self.pipeline.max_artifact_mb = parse_env("MEDIAGATE_MAX_ARTIFACT_MB", &max_mb)?;
        }
        if let Ok(timeout) = env::var("MEDIAGATE_ACQUIRE_TIMEOUT_SECS") {
            self.pipeline.acquire_timeout_secs =
                parse_env("MEDIAGATE_ACQUIRE_TIMEOUT_SECS", &timeout)?;
        }
        if let Ok(height) = env::var("MEDIAGATE_PREFER_HEIGHT") {
            self.pipeline.prefer_height = parse_env("MEDIAGATE_PREFER_HEIGHT", &height)?;
        }
        if let Ok(url) = env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(max_conn) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_env("DATABASE_MAX_CONNECTIONS", &max_conn)?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.admission.validate()?;
        self.pipeline.validate()?;
        self.database.validate()?;
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| GatewayError::Config(format!("Invalid {}: {}", name, e)))
}
