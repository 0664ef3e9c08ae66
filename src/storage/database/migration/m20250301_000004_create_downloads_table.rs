use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Downloads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Downloads::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Downloads::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(Downloads::Ts)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Downloads::Source).string_len(16).not_null())
                    .col(ColumnDef::new(Downloads::Url).text().not_null())
                    .col(ColumnDef::new(Downloads::Title).text().null())
                    .col(ColumnDef::new(Downloads::DurationSecs).integer().null())
                    .col(ColumnDef::new(Downloads::FileSize).big_integer().null())
                    .col(ColumnDef::new(Downloads::Ext).string_len(8).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_downloads_user_id")
                            .from(Downloads::Table, Downloads::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Downloads::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Downloads {
    Table,
    Id,
    UserId,
    Ts,
    Source,
    Url,
    Title,
    DurationSecs,
    FileSize,
    Ext,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
