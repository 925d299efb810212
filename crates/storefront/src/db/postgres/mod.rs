//! `PostgreSQL` implementation of the repository traits.
//!
//! Queries are plain runtime-checked sqlx queries mapped through `FromRow`
//! row structs, then converted into core domain types. Text columns that
//! carry validated types (emails, slugs) are re-parsed on the way out and
//! surface as [`RepositoryError::DataCorruption`] when they fail.

mod catalog;
mod store_products;
mod stores;
mod users;

use sqlx::PgPool;

use super::RepositoryError;

/// Repository backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map a unique violation to `Conflict(message)`, anything else to `Database`.
fn conflict_on_unique(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}
