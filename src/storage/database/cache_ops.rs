//! Delivery cache operations
//!
//! The cache maps `(provider, media_id, kind)` to the content handles the
//! transport assigned when the artifact was delivered. Lookups are plain
//! point reads; writes are a single atomic insert-or-update on the unique
//! key, so two acquisitions racing on first insert converge to one row with
//! one of the two handle pairs — the conflict never surfaces.

use super::entities::media_cache;
use crate::core::pipeline::MediaKind;
use crate::core::providers::ContentHandles;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};
use tracing::debug;

/// One delivery to record in the cache.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryRecord<'a> {
    /// Coarse source label (shorts/reels/tiktok/other)
    pub source: &'a str,
    /// Provider (extractor) name
    pub provider: &'a str,
    /// Provider-assigned media identity
    pub media_id: &'a str,
    /// Media kind
    pub kind: MediaKind,
    /// Transport-assigned content handles
    pub handles: &'a ContentHandles,
}

/// Look up the primary content handle for an already-delivered item.
/// Absence is not an error.
pub async fn lookup_delivery_handle(
    db: &DatabaseConnection,
    provider: &str,
    media_id: &str,
    kind: MediaKind,
) -> Result<Option<String>, DbErr> {
    let row = media_cache::Entity::find()
        .filter(media_cache::Column::Provider.eq(provider))
        .filter(media_cache::Column::MediaId.eq(media_id))
        .filter(media_cache::Column::Kind.eq(kind.as_str()))
        .one(db)
        .await?;
    Ok(row.map(|r| r.delivery_handle))
}

/// Insert or update the cache row for one delivered item.
///
/// Last writer wins on the handle columns; the unique `(provider, media_id,
/// kind)` key guarantees a single row per identity.
pub async fn upsert_delivery_handle(
    db: &DatabaseConnection,
    record: DeliveryRecord<'_>,
) -> Result<(), DbErr> {
    let row = media_cache::ActiveModel {
        id: NotSet,
        source: Set(record.source.to_string()),
        provider: Set(record.provider.to_string()),
        media_id: Set(record.media_id.to_string()),
        kind: Set(record.kind.as_str().to_string()),
        delivery_handle: Set(record.handles.primary.clone()),
        delivery_unique_handle: Set(record.handles.secondary.clone()),
        created_at: Set(chrono::Utc::now()),
    };

    media_cache::Entity::insert(row)
        .on_conflict(
            OnConflict::columns([
                media_cache::Column::Provider,
                media_cache::Column::MediaId,
                media_cache::Column::Kind,
            ])
            .update_columns([
                media_cache::Column::DeliveryHandle,
                media_cache::Column::DeliveryUniqueHandle,
            ])
            .to_owned(),
        )
        .exec(db)
        .await?;

    debug!(
        provider = record.provider,
        media_id = record.media_id,
        kind = %record.kind,
        "delivery handle cached"
    );
    Ok(())
}
