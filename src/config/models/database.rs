//! Durable store configuration

use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for the durable store backing the media cache and
/// telemetry tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL (`sqlite://...` or `postgres://...`)
    #[serde(default = "default_url")]
    pub url: String,
    /// Maximum pool connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Connect timeout
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Validate the store settings
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(GatewayError::Config("database.url must not be empty".into()));
        }
        if self.max_connections == 0 {
            return Err(GatewayError::Config(
                "database.max_connections must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_url() -> String {
    "sqlite://data/mediagate.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DatabaseConfig::default();
        assert!(config.url.starts_with("sqlite://"));
        assert_eq!(config.max_connections, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_url_rejected() {
        let config = DatabaseConfig {
            url: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
