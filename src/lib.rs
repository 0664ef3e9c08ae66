//! # mediagate
//!
//! Per-user admission control and media acquisition core for chat-driven
//! media bots. Sits between a chat transport and a set of unreliable, slow,
//! rate-limited media providers.
//!
//! ## Features
//!
//! - **Admission control**: sliding-window rate gate with cooldown, bounded
//!   per-user FIFO queue, duplicate-inflight rejection, per-user execution lock
//! - **Format fallback**: acquisitions walk an ordered ladder of
//!   format/quality candidates until one succeeds within size/time budgets
//! - **Delivery cache**: durable dedup index mapping `(provider, media_id,
//!   kind)` to transport-assigned content handles
//! - **Pluggable providers**: extraction, download, and transcoding are
//!   injected async traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mediagate::{Config, MediaDatabase, MediaKind, MediaService, RequestKey};
//! # use mediagate::{MediaProvider, Transcoder};
//!
//! # async fn run(provider: Arc<dyn MediaProvider>, transcoder: Arc<dyn Transcoder>)
//! #     -> mediagate::Result<()> {
//! let config = Config::from_file("config/mediagate.yaml").await?;
//! let database = MediaDatabase::connect(&config.database).await?;
//! database.migrate().await?;
//!
//! let service = MediaService::new(&config, database.connection().clone(), provider, transcoder);
//! let acquisition = service
//!     .handle_request(42, RequestKey::new("https://example.com/watch/abc"), MediaKind::Video)
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{GatewayError, Result};

pub use core::admission::{
    AdmissionController, AdmissionError, AdmissionPermit, InflightRegistry, RateGate, RequestKey,
    RequestQueue, UserId, UserLocks,
};
pub use core::pipeline::{
    AcquireError, AcquisitionPipeline, Artifact, FormatCandidate, MediaKind, PlatformHint,
};
pub use core::providers::{
    ContentHandles, MediaMeta, MediaProvider, ProbeQuality, ProviderError, Transcoder,
    TranscodeError,
};
pub use core::service::{Acquisition, DeliveryOutcome, MediaService};
pub use storage::database::MediaDatabase;

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
