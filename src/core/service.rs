//! End-to-end request service
//!
//! Control flow for one request: admission (rate gate → inflight → queue →
//! user lock) → metadata probe → cache lookup → acquisition on miss → cache
//! write-back once the transport confirms delivery. The admission permit is
//! held across the whole sequence, so queue/lock/inflight release only after
//! delivery bookkeeping finishes (or the [`Acquisition`] is dropped).

use crate::config::Config;
use crate::core::admission::{AdmissionController, AdmissionPermit, RequestKey, UserId};
use crate::core::pipeline::{AcquisitionPipeline, Artifact, MediaKind, PlatformHint};
use crate::core::providers::{ContentHandles, MediaMeta, MediaProvider, ProbeQuality, ProviderError};
use crate::storage::database::{cache_ops, telemetry_ops};
use crate::utils::error::Result;
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The media gateway service: admission control in front of cached
/// acquisition.
pub struct MediaService {
    admission: AdmissionController,
    pipeline: AcquisitionPipeline,
    provider: Arc<dyn MediaProvider>,
    db: DatabaseConnection,
}

impl MediaService {
    /// Build the service from configuration plus injected collaborators.
    pub fn new(
        config: &Config,
        db: DatabaseConnection,
        provider: Arc<dyn MediaProvider>,
        transcoder: Arc<dyn crate::core::providers::Transcoder>,
    ) -> Self {
        Self {
            admission: AdmissionController::new(config.admission.clone()),
            pipeline: AcquisitionPipeline::new(
                config.pipeline.clone(),
                Arc::clone(&provider),
                transcoder,
            ),
            provider,
            db,
        }
    }

    /// Handle one request end to end, up to the point of delivery.
    ///
    /// On success the returned [`Acquisition`] carries either a cached
    /// content handle or a freshly acquired artifact, plus the admission
    /// permit. Call [`Acquisition::confirm_delivered`] after the transport
    /// has accepted the artifact; dropping the acquisition without
    /// confirming releases all admission state and caches nothing.
    pub async fn handle_request(
        &self,
        user: UserId,
        key: RequestKey,
        kind: MediaKind,
    ) -> Result<Acquisition> {
        let permit = self.admission.admit(user, &key).await?;
        self.note_event(user, "request", Some(json!({ "key": key.as_str(), "kind": kind })))
            .await;

        let meta = match self.probe(&key).await {
            Ok(meta) => meta,
            Err(e) => {
                self.note_event(user, "error", Some(json!({ "stage": "probe", "error": e.to_string() })))
                    .await;
                return Err(e.into());
            }
        };

        let source = PlatformHint::classify(&key).source_label();

        if let Some(handle) =
            cache_ops::lookup_delivery_handle(&self.db, &meta.provider, &meta.media_id, kind).await?
        {
            debug!(user, key = %key, %kind, "cache hit, skipping acquisition");
            return Ok(Acquisition {
                meta,
                kind,
                outcome: DeliveryOutcome::Cached { handle },
                user,
                key,
                source,
                db: self.db.clone(),
                _permit: permit,
            });
        }

        let artifact = match self.pipeline.acquire(&key, kind).await {
            Ok(artifact) => artifact,
            Err(e) => {
                self.note_event(user, "error", Some(json!({ "stage": "acquire", "error": e.to_string() })))
                    .await;
                return Err(e.into());
            }
        };
        info!(
            user,
            key = %key,
            %kind,
            size = artifact.size_bytes(),
            "acquisition complete"
        );

        Ok(Acquisition {
            meta,
            kind,
            outcome: DeliveryOutcome::Fresh { artifact },
            user,
            key,
            source,
            db: self.db.clone(),
            _permit: permit,
        })
    }

    /// Probe metadata, preferring the best-quality probe and falling back to
    /// a plain one when the provider rejects it.
    async fn probe(&self, key: &RequestKey) -> std::result::Result<MediaMeta, ProviderError> {
        match self
            .provider
            .extract_metadata(key, ProbeQuality::BestFormats)
            .await
        {
            Ok(meta) => Ok(meta),
            Err(e) => {
                debug!(key = %key, error = %e, "best-format probe failed, retrying plain");
                self.provider.extract_metadata(key, ProbeQuality::Default).await
            }
        }
    }

    /// Record a telemetry event; failures are logged, never propagated.
    async fn note_event(&self, user: UserId, event_type: &str, payload: Option<serde_json::Value>) {
        if let Err(e) = telemetry_ops::record_event(&self.db, user, event_type, payload).await {
            warn!(user, event_type, error = %e, "failed to record event");
        }
    }

    /// The admission controller, for introspection.
    pub fn admission(&self) -> &AdmissionController {
        &self.admission
    }
}

/// How a request was satisfied.
pub enum DeliveryOutcome {
    /// An identical item was delivered before; reuse its content handle.
    Cached {
        /// Transport content handle from the cache
        handle: String,
    },
    /// A fresh acquisition produced a local artifact.
    Fresh {
        /// The locally materialized media file
        artifact: Artifact,
    },
}

/// A request that passed admission and is ready for delivery.
///
/// Holds the admission permit until dropped or confirmed.
pub struct Acquisition {
    /// Provider metadata for the requested item
    pub meta: MediaMeta,
    /// Requested media kind
    pub kind: MediaKind,
    outcome: DeliveryOutcome,
    user: UserId,
    key: RequestKey,
    source: &'static str,
    db: DatabaseConnection,
    _permit: AdmissionPermit,
}

impl Acquisition {
    /// How this request was satisfied.
    pub fn outcome(&self) -> &DeliveryOutcome {
        &self.outcome
    }

    /// True when the request was served from the delivery cache.
    pub fn is_cached(&self) -> bool {
        matches!(self.outcome, DeliveryOutcome::Cached { .. })
    }

    /// The cached content handle, when served from cache.
    pub fn cached_handle(&self) -> Option<&str> {
        match &self.outcome {
            DeliveryOutcome::Cached { handle } => Some(handle),
            DeliveryOutcome::Fresh { .. } => None,
        }
    }

    /// The fresh artifact, when one was acquired.
    pub fn artifact(&self) -> Option<&Artifact> {
        match &self.outcome {
            DeliveryOutcome::Fresh { artifact } => Some(artifact),
            DeliveryOutcome::Cached { .. } => None,
        }
    }

    /// Record a successful delivery: upsert the cache with the
    /// transport-assigned handles and write download/event telemetry.
    ///
    /// Consumes the acquisition; the admission permit is released when this
    /// returns.
    pub async fn confirm_delivered(self, handles: ContentHandles) -> Result<()> {
        cache_ops::upsert_delivery_handle(
            &self.db,
            cache_ops::DeliveryRecord {
                source: self.source,
                provider: &self.meta.provider,
                media_id: &self.meta.media_id,
                kind: self.kind,
                handles: &handles,
            },
        )
        .await?;

        let (file_size, ext) = match &self.outcome {
            DeliveryOutcome::Fresh { artifact } => (
                Some(artifact.size_bytes() as i64),
                artifact.extension().map(|e| e.to_string()),
            ),
            DeliveryOutcome::Cached { .. } => (None, None),
        };

        let stats = telemetry_ops::DownloadRecord {
            source: self.source,
            url: self.key.as_str(),
            title: Some(self.meta.title.as_str()),
            duration_secs: self.meta.duration_secs.map(|d| d as i32),
            file_size,
            ext: ext.as_deref(),
        };
        if let Err(e) = telemetry_ops::record_download(&self.db, self.user, stats).await {
            warn!(user = self.user, error = %e, "failed to record download stats");
        }
        if let Err(e) = telemetry_ops::record_event(
            &self.db,
            self.user,
            "delivered",
            Some(json!({ "key": self.key.as_str(), "kind": self.kind })),
        )
        .await
        {
            warn!(user = self.user, error = %e, "failed to record delivery event");
        }

        debug!(user = self.user, key = %self.key, kind = %self.kind, "delivery confirmed");
        Ok(())
    }
}
