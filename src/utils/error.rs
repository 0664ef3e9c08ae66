//! Error handling for the gateway core
//!
//! This module defines the top-level error type used throughout the crate.
//! Component-level errors ([`AdmissionError`], [`AcquireError`],
//! [`ProviderError`]) live next to the components that raise them and convert
//! into [`GatewayError`] at the service boundary.

use crate::core::admission::AdmissionError;
use crate::core::pipeline::AcquireError;
use crate::core::providers::ProviderError;
use thiserror::Error;

/// Result type alias for the gateway core
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the gateway core
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Admission denied (rate limited, queue overflow, duplicate in flight)
    #[error("Admission denied: {0}")]
    Admission(#[from] AdmissionError),

    /// Acquisition pipeline failure
    #[error("Acquisition failed: {0}")]
    Acquire(#[from] AcquireError),

    /// Provider errors outside the pipeline ladder (metadata probes)
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GatewayError {
    /// True when the error is a deliberate backpressure signal that the
    /// caller should surface to the user as-is, without retrying.
    pub fn is_backpressure(&self) -> bool {
        matches!(self, GatewayError::Admission(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_admission_errors_are_backpressure() {
        let err = GatewayError::from(AdmissionError::QueueOverflow);
        assert!(err.is_backpressure());

        let err = GatewayError::from(AdmissionError::RateLimited {
            retry_after: Duration::from_secs(3),
        });
        assert!(err.is_backpressure());

        let err = GatewayError::Config("bad".into());
        assert!(!err.is_backpressure());
    }

    #[test]
    fn test_display_includes_cause() {
        let err = GatewayError::from(AdmissionError::DuplicateInFlight);
        assert!(err.to_string().contains("already in progress"));
    }
}
