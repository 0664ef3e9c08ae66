use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Delivery cache row: maps a provider-assigned media identity to the
/// content handles the transport assigned when the artifact was first
/// delivered. A dedup index, not a blob store — no media bytes live here.
///
/// `(provider, media_id, kind)` is unique; writes to an existing key update
/// the handles in place.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "media_cache")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Coarse source label (shorts/reels/tiktok/other)
    pub source: String,

    /// Provider (extractor) name that produced the media identity
    pub provider: String,

    /// Provider-assigned media identity
    pub media_id: String,

    /// Media kind (video/audio/image/document)
    pub kind: String,

    /// Primary transport content handle, reusable for resends
    pub delivery_handle: String,

    /// Secondary stable transport identity
    pub delivery_unique_handle: String,

    /// When the row was first written
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
