//! Schema migrations

use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_table;
mod m20250301_000002_create_media_cache_table;
mod m20250301_000003_create_events_table;
mod m20250301_000004_create_downloads_table;

/// Aggregated migrator for the gateway schema.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_table::Migration),
            Box::new(m20250301_000002_create_media_cache_table::Migration),
            Box::new(m20250301_000003_create_events_table::Migration),
            Box::new(m20250301_000004_create_downloads_table::Migration),
        ]
    }
}
