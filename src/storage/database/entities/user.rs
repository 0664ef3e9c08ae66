use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A known requester, keyed by the opaque chat-surface identity.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Chat-surface user identity (unique)
    #[sea_orm(unique)]
    pub chat_id: i64,

    /// First name as reported by the chat surface
    pub first_name: Option<String>,

    /// Last name
    pub last_name: Option<String>,

    /// Username/handle
    pub username: Option<String>,

    /// Language code
    pub lang: Option<String>,

    /// Creation timestamp
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Downloads recorded for this user
    #[sea_orm(has_many = "super::download::Entity")]
    Downloads,

    /// Events recorded for this user
    #[sea_orm(has_many = "super::event::Entity")]
    Events,
}

impl Related<super::download::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Downloads.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
