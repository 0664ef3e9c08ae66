use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One delivered download, for stats.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "downloads")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Owning user row
    pub user_id: i32,

    /// Delivery timestamp
    pub ts: DateTimeUtc,

    /// Coarse source label (shorts/reels/tiktok/other)
    pub source: String,

    /// Requested URL
    pub url: String,

    /// Item title at delivery time
    pub title: Option<String>,

    /// Duration in seconds, when known
    pub duration_secs: Option<i32>,

    /// Artifact size in bytes (None for cache hits)
    pub file_size: Option<i64>,

    /// Artifact file extension
    pub ext: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
