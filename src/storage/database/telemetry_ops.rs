//! User/event/download telemetry operations
//!
//! Telemetry is best-effort bookkeeping: callers log failures and move on,
//! a failed stats write never fails the request that produced it.

use super::entities::user;
use super::entities::{download, event};
use crate::core::admission::UserId;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};

/// Profile fields reported by the chat surface.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub lang: Option<String>,
}

/// Upsert a user row by chat id, refreshing profile fields.
///
/// Returns the stored row. Safe under concurrent upserts of the same chat
/// id: the unique key makes the insert conflict, which updates in place.
pub async fn upsert_user(
    db: &DatabaseConnection,
    chat_id: UserId,
    profile: UserProfile,
) -> Result<user::Model, DbErr> {
    let row = user::ActiveModel {
        id: NotSet,
        chat_id: Set(chat_id),
        first_name: Set(profile.first_name),
        last_name: Set(profile.last_name),
        username: Set(profile.username),
        lang: Set(profile.lang),
        created_at: Set(chrono::Utc::now()),
    };

    user::Entity::insert(row)
        .on_conflict(
            OnConflict::column(user::Column::ChatId)
                .update_columns([
                    user::Column::FirstName,
                    user::Column::LastName,
                    user::Column::Username,
                    user::Column::Lang,
                ])
                .to_owned(),
        )
        .exec(db)
        .await?;

    find_by_chat_id(db, chat_id)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("user with chat_id {chat_id}")))
}

/// Fetch a user row by chat id, creating a bare row when none exists.
///
/// Unlike [`upsert_user`] this never overwrites an existing profile; a lost
/// insert race is recovered by re-reading the row.
pub async fn ensure_user(db: &DatabaseConnection, chat_id: UserId) -> Result<user::Model, DbErr> {
    if let Some(existing) = find_by_chat_id(db, chat_id).await? {
        return Ok(existing);
    }

    let row = user::ActiveModel {
        id: NotSet,
        chat_id: Set(chat_id),
        first_name: Set(None),
        last_name: Set(None),
        username: Set(None),
        lang: Set(None),
        created_at: Set(chrono::Utc::now()),
    };
    match user::Entity::insert(row)
        .on_conflict(OnConflict::column(user::Column::ChatId).do_nothing().to_owned())
        .exec(db)
        .await
    {
        Ok(_) => {}
        // Another writer created the row between our read and insert.
        Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e),
    }

    find_by_chat_id(db, chat_id)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("user with chat_id {chat_id}")))
}

async fn find_by_chat_id(
    db: &DatabaseConnection,
    chat_id: UserId,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::ChatId.eq(chat_id))
        .one(db)
        .await
}

/// Record a telemetry event for `chat_id`.
pub async fn record_event(
    db: &DatabaseConnection,
    chat_id: UserId,
    event_type: &str,
    payload: Option<serde_json::Value>,
) -> Result<(), DbErr> {
    let owner = ensure_user(db, chat_id).await?;
    let row = event::ActiveModel {
        id: NotSet,
        user_id: Set(owner.id),
        ts: Set(chrono::Utc::now()),
        event_type: Set(event_type.to_string()),
        payload: Set(payload.map(|p| p.to_string())),
    };
    event::Entity::insert(row).exec(db).await?;
    Ok(())
}

/// Download stats for one delivered item.
#[derive(Debug, Clone, Copy)]
pub struct DownloadRecord<'a> {
    pub source: &'a str,
    pub url: &'a str,
    pub title: Option<&'a str>,
    pub duration_secs: Option<i32>,
    pub file_size: Option<i64>,
    pub ext: Option<&'a str>,
}

/// Record a delivered download for `chat_id`.
pub async fn record_download(
    db: &DatabaseConnection,
    chat_id: UserId,
    record: DownloadRecord<'_>,
) -> Result<(), DbErr> {
    let owner = ensure_user(db, chat_id).await?;
    let row = download::ActiveModel {
        id: NotSet,
        user_id: Set(owner.id),
        ts: Set(chrono::Utc::now()),
        source: Set(record.source.to_string()),
        url: Set(record.url.to_string()),
        title: Set(record.title.map(|t| t.to_string())),
        duration_secs: Set(record.duration_secs),
        file_size: Set(record.file_size),
        ext: Set(record.ext.map(|e| e.to_string())),
    };
    download::Entity::insert(row).exec(db).await?;
    Ok(())
}
