use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MediaCache::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MediaCache::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MediaCache::Source).string_len(16).not_null())
                    .col(ColumnDef::new(MediaCache::Provider).string_len(64).not_null())
                    .col(ColumnDef::new(MediaCache::MediaId).string_len(256).not_null())
                    .col(ColumnDef::new(MediaCache::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(MediaCache::DeliveryHandle).text().not_null())
                    .col(
                        ColumnDef::new(MediaCache::DeliveryUniqueHandle)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MediaCache::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Uniqueness of the dedup key; upserts conflict on this index.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_media_cache_provider_media_kind")
                    .table(MediaCache::Table)
                    .col(MediaCache::Provider)
                    .col(MediaCache::MediaId)
                    .col(MediaCache::Kind)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MediaCache::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MediaCache {
    Table,
    Id,
    Source,
    Provider,
    MediaId,
    Kind,
    DeliveryHandle,
    DeliveryUniqueHandle,
    CreatedAt,
}
