//! Database connection and initialization.

use std::collections::HashSet;

use sea_orm::{ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;

use crate::config::Config;

pub mod migrations;

pub use migrations::Migrator;

/// One schema migration and whether it has run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationState {
    pub name: String,
    pub applied: bool,
}

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Connect and apply pending migrations.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        Self::connect_url(&config.database_url).await
    }

    /// Connect to `url` and apply pending migrations.
    pub async fn connect_url(url: &str) -> Result<Self, DbErr> {
        let connection = SeaDatabase::connect(url).await?;

        Migrator::up(&connection, None).await.map_err(|e| {
            tracing::error!("Failed to run migrations: {}", e);
            e
        })?;

        tracing::info!("Database connected and migrations applied");

        Ok(Self { connection })
    }

    /// Connect without running migrations (for CLI commands).
    pub async fn connect_without_migrations(config: &Config) -> Result<Self, DbErr> {
        let connection = SeaDatabase::connect(&config.database_url).await?;
        Ok(Self { connection })
    }

    /// Get a clone of the database connection.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Apply pending migrations, returning how many ran.
    pub async fn apply_pending(&self) -> Result<usize, DbErr> {
        let pending = Migrator::get_pending_migrations(&self.connection).await?.len();
        if pending > 0 {
            Migrator::up(&self.connection, None).await?;
        }
        Ok(pending)
    }

    /// Undo the newest `steps` applied migrations.
    pub async fn roll_back(&self, steps: u32) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(steps)).await
    }

    /// Every known migration in order, with whether it is applied.
    pub async fn migration_states(&self) -> Result<Vec<MigrationState>, DbErr> {
        let applied: HashSet<String> = Migrator::get_applied_migrations(&self.connection)
            .await?
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        Ok(Migrator::migrations()
            .iter()
            .map(|m| MigrationState {
                applied: applied.contains(m.name()),
                name: m.name().to_string(),
            })
            .collect())
    }

    /// Drop every table and rebuild the schema from scratch.
    pub async fn rebuild(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}
