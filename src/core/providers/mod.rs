//! Media provider abstractions
//!
//! The concrete extraction/download tooling and the transcoder live outside
//! this crate; the core consumes them through these object-safe async traits.
//! Implementations wrap whatever tool the deployment runs (an extractor
//! binary, a remote fetch service, ffmpeg) and are expected to tolerate being
//! driven under a hard outer timeout — the pipeline cancels mid-call when its
//! acquisition budget expires.

use crate::core::admission::RequestKey;
use crate::core::pipeline::FormatCandidate;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Metadata describing a remote media item, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaMeta {
    /// Human-readable title
    pub title: String,
    /// Uploader/author, when known
    pub uploader: Option<String>,
    /// Duration in seconds, when known
    pub duration_secs: Option<u32>,
    /// Approximate size in bytes, when the provider reports one
    pub size_approx_bytes: Option<u64>,
    /// Canonical URL of the item
    pub canonical_url: String,
    /// Provider name (the extractor that claims this URL)
    pub provider: String,
    /// Provider-assigned media identity; cache key component
    pub media_id: String,
}

/// How aggressively a metadata probe should ask for format information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeQuality {
    /// Probe with the best-quality format expression first
    BestFormats,
    /// Plain probe without format constraints
    Default,
}

/// Errors raised by provider implementations.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider could not serve the request (network failure, removed or
    /// private media, unsupported URL, ...)
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The request itself was malformed for this provider
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Local IO while materializing the fetch
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A media extraction/download backend.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Probe `key` for metadata without downloading.
    ///
    /// Callers first probe with [`ProbeQuality::BestFormats`] and fall back
    /// to [`ProbeQuality::Default`] when that fails; playlist-shaped results
    /// should already be unwrapped to their first playable entry.
    async fn extract_metadata(
        &self,
        key: &RequestKey,
        probe: ProbeQuality,
    ) -> Result<MediaMeta, ProviderError>;

    /// Fetch `key` using one format candidate, writing output files into
    /// `dest`. The provider must refuse to produce files larger than
    /// `size_limit_bytes` where it can know sizes up front; the pipeline
    /// re-checks the produced artifact afterwards either way.
    ///
    /// The pipeline locates the produced artifact itself (newest file under
    /// `dest`), so implementations need not report the exact path.
    async fn fetch(
        &self,
        key: &RequestKey,
        candidate: &FormatCandidate,
        size_limit_bytes: u64,
        dest: &Path,
    ) -> Result<(), ProviderError>;
}

/// Transcode failure. Non-fatal to an acquisition: the pipeline falls back
/// to the untranscoded artifact.
#[derive(Error, Debug)]
#[error("transcode failed: {0}")]
pub struct TranscodeError(pub String);

/// Container conversion backend.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// File extension of the standard container (without the dot).
    fn target_extension(&self) -> &'static str {
        "mp4"
    }

    /// Convert `input` into the standard container, returning the path of
    /// the converted file (which may live next to the input).
    async fn to_standard_container(&self, input: &Path) -> Result<PathBuf, TranscodeError>;
}

/// Content identities assigned by the transport surface to a delivered
/// artifact: a primary reusable handle and a secondary stable identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHandles {
    /// Primary handle, reusable to resend without re-fetching
    pub primary: String,
    /// Secondary stable identity
    pub secondary: String,
}

impl ContentHandles {
    /// Convenience constructor.
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }
}
