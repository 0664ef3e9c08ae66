//! Acquisition pipeline execution

use super::ladder::format_ladder;
use super::platform::PlatformHint;
use super::types::{AcquireError, Artifact, MediaKind};
use super::workspace::Workspace;
use crate::config::PipelineConfig;
use crate::core::admission::RequestKey;
use crate::core::providers::{MediaProvider, Transcoder};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Orchestrates provider calls through the format-candidate ladder under the
/// configured size and time budgets.
///
/// Provider failures are retried only by moving to the *next* candidate,
/// never by repeating one. The whole call is bounded by one outer timeout
/// independent of how many candidates are tried; when it fires, the scratch
/// workspace is dropped and cleaned with the in-flight future.
pub struct AcquisitionPipeline {
    config: PipelineConfig,
    provider: Arc<dyn MediaProvider>,
    transcoder: Arc<dyn Transcoder>,
}

impl AcquisitionPipeline {
    /// Create a pipeline around the injected provider and transcoder.
    pub fn new(
        config: PipelineConfig,
        provider: Arc<dyn MediaProvider>,
        transcoder: Arc<dyn Transcoder>,
    ) -> Self {
        Self {
            config,
            provider,
            transcoder,
        }
    }

    /// Fetch `key` as `kind`, returning a locally materialized artifact.
    pub async fn acquire(&self, key: &RequestKey, kind: MediaKind) -> Result<Artifact, AcquireError> {
        let budget = self.config.acquire_timeout();
        match tokio::time::timeout(budget, self.run_ladder(key, kind)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(key = %key, %kind, after = ?budget, "acquisition timed out");
                Err(AcquireError::Timeout(budget))
            }
        }
    }

    async fn run_ladder(&self, key: &RequestKey, kind: MediaKind) -> Result<Artifact, AcquireError> {
        let hint = PlatformHint::classify(key);
        let candidates = format_ladder(kind, hint, self.config.prefer_height);
        let limit = self.config.max_artifact_bytes();
        let workspace = Workspace::create()?;

        let mut last_err: Option<AcquireError> = None;

        for (attempt, candidate) in candidates.iter().enumerate() {
            workspace.clear().await?;

            if let Err(e) = self
                .provider
                .fetch(key, candidate, limit, workspace.path())
                .await
            {
                debug!(key = %key, attempt, selector = %candidate.selector, error = %e, "candidate failed");
                last_err = Some(AcquireError::ProviderUnavailable(e.to_string()));
                continue;
            }

            let Some((path, size)) = workspace.newest_file().await? else {
                debug!(key = %key, attempt, "provider produced no output");
                last_err = Some(AcquireError::ProviderUnavailable(
                    "no output files produced".to_string(),
                ));
                continue;
            };

            if size == 0 {
                debug!(key = %key, attempt, "downloaded file is empty");
                last_err = Some(AcquireError::EmptyArtifact);
                continue;
            }

            let (path, size) = if kind == MediaKind::Video {
                self.standardize_container(path, size).await
            } else {
                (path, size)
            };

            if size > limit {
                warn!(key = %key, attempt, size, limit, "artifact over size budget");
                last_err = Some(AcquireError::SizeExceeded { size, limit });
                continue;
            }

            let artifact = workspace.promote(&path).await?;
            debug!(
                key = %key,
                attempt,
                selector = %candidate.selector,
                size = artifact.size_bytes(),
                "acquisition succeeded"
            );
            return Ok(artifact);
        }

        Err(last_err.unwrap_or_else(|| {
            AcquireError::NoViableFormat("no format candidates for this request".to_string())
        }))
    }

    /// Convert a video artifact into the standard container. Conversion
    /// failure is non-fatal: the original artifact is kept.
    async fn standardize_container(&self, path: PathBuf, size: u64) -> (PathBuf, u64) {
        let target = self.transcoder.target_extension();
        let already_standard = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(target));
        if already_standard {
            return (path, size);
        }

        match self.transcoder.to_standard_container(&path).await {
            Ok(converted) => match tokio::fs::metadata(&converted).await {
                Ok(meta) => (converted, meta.len()),
                Err(e) => {
                    warn!(path = %converted.display(), error = %e, "converted file unreadable, keeping original");
                    (path, size)
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "transcode failed, keeping original container");
                (path, size)
            }
        }
    }
}
