//! SQLite backend for the concierge engine.
//!
//! Queries live in per-table modules under [`db`]; [`SqliteDatabase`] stitches them together to
//! satisfy the engine traits. One pooled connection is acquired per call and released when it
//! drops, success or error. No call spans more than one connection.
pub(crate) mod db;
mod sqlite_impl;

use std::env;

use log::info;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
pub use sqlite_impl::SqliteDatabase;
use thiserror::Error;

const SQLITE_DB_URL: &str = "sqlite://data/concierge.db";

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Database migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

pub fn db_url() -> String {
    let result = env::var("VGX_DATABASE_URL").unwrap_or_else(|_| {
        info!("VGX_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

/// Creates a connection pool and brings the schema up to date.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqliteDatabaseError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}
