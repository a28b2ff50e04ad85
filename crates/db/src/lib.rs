//! Quire persistence layer.
//!
//! - [`store`] -- the [`DocumentStore`](store::DocumentStore) trait with its
//!   in-memory and PostgreSQL implementations.
//! - [`document`] -- document kind tags and typed encode/decode helpers.
//! - [`models`] -- articles, history bodies, users and singleton documents.
//! - [`repositories`] -- the read/modify/write protocols built on the store.

use sqlx::postgres::PgPoolOptions;

pub mod document;
pub mod error;
pub mod models;
pub mod repositories;
pub mod store;

pub use error::DbError;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
