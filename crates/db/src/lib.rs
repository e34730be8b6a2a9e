use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

pub mod entities;
pub mod models;
pub mod types;

pub use sea_orm::{DbErr, TransactionTrait};

pub type DbPool = DatabaseConnection;

/// Handle to the relational store. Constructed from an explicit database URL
/// so tests can spin up isolated in-memory instances.
#[derive(Clone)]
pub struct DBService {
    pub pool: DbPool,
}

impl DBService {
    /// Connect and bring the schema up to date.
    pub async fn new(database_url: &str) -> Result<DBService, DbErr> {
        let mut options = ConnectOptions::new(database_url);
        // A single connection keeps `sqlite::memory:` databases coherent and
        // serializes writes against file-backed stores.
        options
            .max_connections(1)
            .connect_timeout(Duration::from_secs(30));
        let pool = Database::connect(options).await?;
        tracing::debug!(%database_url, "connected, applying pending migrations");
        db_migration::Migrator::up(&pool, None).await?;
        Ok(DBService { pool })
    }
}
