//! Persistence layer: entities, migrations, and repositories.
//!
//! Everything above this crate goes through a repository; nothing else
//! issues queries. Connections are opened by the binary, which hands an
//! `Arc<DatabaseConnection>` to each repository it constructs.

pub mod entities;
pub mod migrations;
pub mod repositories;
pub mod test_utils;

use reclaim_common::AppError;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

/// Bring the schema up to date.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}
