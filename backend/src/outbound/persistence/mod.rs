//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel models and
//! domain types; no business logic lives here. Row structs (`models.rs`)
//! and schema definitions (`schema.rs`) stay internal to this module, and
//! connections come from a `bb8` pool via `diesel-async`.

mod diesel_user_repository;
mod models;
mod pool;
mod schema;

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use thiserror::Error;
use tracing::info;

pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failure while bringing the schema up to date at startup.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {0}")]
    Connect(#[from] diesel::ConnectionError),

    #[error("failed to run migrations: {0}")]
    Run(Box<dyn std::error::Error + Send + Sync>),
}

/// Apply all pending embedded migrations.
///
/// Diesel's migration harness is synchronous, so this runs on a blocking
/// thread; call it once during startup before accepting traffic.
pub async fn run_migrations(database_url: &str) -> Result<(), MigrationError> {
    let database_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || -> Result<(), MigrationError> {
        let mut conn = PgConnection::establish(&database_url)?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(MigrationError::Run)?;
        for migration in &applied {
            info!(%migration, "applied migration");
        }
        Ok(())
    })
    .await
    .map_err(|err| MigrationError::Run(Box::new(err)))?
}
