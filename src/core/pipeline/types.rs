//! Pipeline types and errors

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use thiserror::Error;

/// What kind of artifact an acquisition should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
    Document,
}

impl MediaKind {
    /// Stable string form, used as the cache `kind` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Image => "image",
            MediaKind::Document => "document",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post-processing the provider applies after download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostProcess {
    /// No post-processing
    None,
    /// Extract the audio track into the given codec at the given quality
    ExtractAudio {
        codec: &'static str,
        quality: &'static str,
    },
}

/// One concrete format/quality variant offered to the provider.
///
/// `selector` is a provider format expression; candidates for one kind share
/// the same post-processing step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatCandidate {
    /// Provider-side format selector expression
    pub selector: String,
    /// Post-processing applied to the download
    pub post: PostProcess,
}

impl FormatCandidate {
    pub(crate) fn plain(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            post: PostProcess::None,
        }
    }
}

/// A locally materialized media file produced by a successful acquisition.
///
/// The artifact owns its delivery directory: dropping the artifact removes
/// the directory and the file with it, so callers keep it alive until the
/// transport has consumed the file.
#[derive(Debug)]
pub struct Artifact {
    dir: TempDir,
    path: PathBuf,
    size_bytes: u64,
}

impl Artifact {
    pub(crate) fn new(dir: TempDir, path: PathBuf, size_bytes: u64) -> Self {
        Self {
            dir,
            path,
            size_bytes,
        }
    }

    /// Path of the media file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File size in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// File extension without the dot, when present.
    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|e| e.to_str())
    }

    /// File name component.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// Directory owning the artifact, kept for its `Drop` cleanup.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Terminal acquisition failures.
///
/// Provider errors are retried only by moving to the next format candidate;
/// when the ladder exhausts, the *last* recorded error is returned so
/// callers can report the most relevant diagnosis.
#[derive(Error, Debug)]
pub enum AcquireError {
    /// The provider failed this request (network failure, unavailable media)
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The ladder exhausted without any candidate-specific error to report
    #[error("no viable format: {0}")]
    NoViableFormat(String),

    /// The produced artifact exceeded the size budget
    #[error("artifact too large: {size} bytes exceeds limit of {limit} bytes")]
    SizeExceeded { size: u64, limit: u64 },

    /// The produced artifact was empty
    #[error("downloaded file is empty")]
    EmptyArtifact,

    /// Container conversion failed terminally (reported only when the
    /// original artifact was lost as well; a plain conversion failure
    /// degrades to the original artifact instead)
    #[error("transcode failed: {0}")]
    TranscodeFailed(String),

    /// The outer acquisition budget expired
    #[error("acquisition timed out after {0:?}")]
    Timeout(Duration),

    /// Scratch workspace IO failure
    #[error("workspace error: {0}")]
    Workspace(#[from] std::io::Error),
}
