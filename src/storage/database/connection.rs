//! Database connection management

use super::migration::Migrator;
use crate::config::DatabaseConfig;
use crate::utils::error::{GatewayError, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::{debug, info};

/// Handle to the durable store.
#[derive(Clone)]
pub struct MediaDatabase {
    db: DatabaseConnection,
}

impl MediaDatabase {
    /// Open a connection pool against the configured database.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut opt = ConnectOptions::new(config.url.clone());
        opt.max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(config.connect_timeout())
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .sqlx_logging(false);

        let db = Database::connect(opt).await.map_err(GatewayError::Database)?;
        info!("Database connection established");
        Ok(Self { db })
    }

    /// Run pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations");
        Migrator::up(&self.db, None)
            .await
            .map_err(GatewayError::Database)?;
        debug!("Database migrations complete");
        Ok(())
    }

    /// The underlying connection pool.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Cheap connectivity check.
    pub async fn health_check(&self) -> Result<()> {
        use sea_orm::{ConnectionTrait, Statement};
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await
            .map_err(GatewayError::Database)?;
        Ok(())
    }

    /// Close the pool.
    pub async fn close(self) -> Result<()> {
        self.db.close().await.map_err(GatewayError::Database)?;
        Ok(())
    }
}
