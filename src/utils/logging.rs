//! Logging setup
//!
//! The crate itself only emits `tracing` events; installing a subscriber is
//! the embedding application's job. [`init_logging`] is the default setup
//! used by binaries and examples.

use tracing_subscriber::EnvFilter;

/// Install a formatted `tracing` subscriber with env-filter support.
///
/// The filter is read from `RUST_LOG`, falling back to `default_level`
/// (e.g. `"info"` or `"mediagate=debug"`). Calling this twice is a no-op:
/// the second install fails and is ignored.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
