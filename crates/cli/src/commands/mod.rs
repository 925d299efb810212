//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use shopwright_storefront::config::{ConfigError, get_database_url};
use shopwright_storefront::db;
use sqlx::PgPool;

/// Errors shared by commands that talk to the database.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Connect to the storefront database.
pub async fn connect() -> Result<PgPool, ConnectError> {
    let database_url = get_database_url("STOREFRONT_DATABASE_URL")?;
    tracing::info!("Connecting to storefront database...");
    Ok(db::create_pool(&database_url).await?)
}
