//! Persistence for users, the catalog, stores and store products.
//!
//! Route handlers and services talk to the [`Repository`] trait object held
//! in `AppState`. Two implementations exist:
//!
//! - [`PgRepository`] - `PostgreSQL` via sqlx, the production backend
//! - [`MemoryRepository`] - id-keyed maps behind one async lock, used by
//!   tests and `STOREFRONT_BACKEND=memory`
//!
//! # Tables
//!
//! - `users` - accounts with argon2 password hashes and a role
//! - `products` - the shared catalog
//! - `stores` - seller-owned stores, unique `slug`
//! - `store_products` - store/product links, unique `(store_id, product_id)`
//! - `tower_sessions.session` - tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p shopwright-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use shopwright_core::{
    Email, NewProduct, NewStore, NewStoreProduct, Product, ProductId, Store, StoreId,
    StoreProduct, StoreProductEntry, StoreProductId, UserId, UserRole,
};

use crate::models::{CatalogQuery, NewUser, User};

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is invalid or corrupted.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Record not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. `Conflict` if the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    async fn user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// The user and their password hash, for login.
    async fn user_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    /// `NotFound` if the user does not exist.
    async fn set_user_role(&self, id: UserId, role: UserRole) -> Result<User, RepositoryError>;

    async fn count_users(&self) -> Result<i64, RepositoryError>;
}

/// The shared product catalog.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Active products matching the query, sorted and paged.
    async fn browse_products(&self, query: &CatalogQuery) -> Result<Vec<Product>, RepositoryError>;

    /// Any product by id, active or not.
    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Distinct categories of active products, alphabetical.
    async fn categories(&self) -> Result<Vec<String>, RepositoryError>;

    /// `Conflict` if the sku is taken.
    async fn create_product(&self, product: NewProduct) -> Result<Product, RepositoryError>;

    /// Persist every mutable field and bump `updated_at`.
    async fn save_product(&self, product: &Product) -> Result<Product, RepositoryError>;

    /// Newest first.
    async fn list_products(&self, include_inactive: bool) -> Result<Vec<Product>, RepositoryError>;

    /// Active products, highest demand first.
    async fn top_products_by_demand(&self, limit: i64) -> Result<Vec<Product>, RepositoryError>;

    /// Active products below their low-stock threshold, emptiest first.
    async fn low_stock_products(&self, limit: i64) -> Result<Vec<Product>, RepositoryError>;

    async fn count_active_products(&self) -> Result<i64, RepositoryError>;
}

/// Seller stores.
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// Insert a normalized store, assigning the first free slug among
    /// `base`, `base-1`, `base-2`, ...
    async fn create_store(&self, owner: UserId, store: &NewStore) -> Result<Store, RepositoryError>;

    async fn store_by_id(&self, id: StoreId) -> Result<Option<Store>, RepositoryError>;

    async fn store_by_slug(&self, slug: &str) -> Result<Option<Store>, RepositoryError>;

    /// Newest first.
    async fn stores_by_owner(&self, owner: UserId) -> Result<Vec<Store>, RepositoryError>;

    /// Persist the mutable fields and bump `updated_at`. The slug and owner
    /// are never written.
    async fn save_store(&self, store: &Store) -> Result<Store, RepositoryError>;

    /// Delete the store and its product links. `false` if it did not exist.
    async fn delete_store(&self, id: StoreId) -> Result<bool, RepositoryError>;

    async fn count_stores(&self) -> Result<i64, RepositoryError>;
}

/// Links between stores and catalog products.
#[async_trait]
pub trait StoreProductRepository: Send + Sync {
    /// `Conflict` if the product is already in the store, `NotFound` if the
    /// product does not exist.
    async fn add_store_product(
        &self,
        store: StoreId,
        input: &NewStoreProduct,
    ) -> Result<StoreProductEntry, RepositoryError>;

    /// A link of `store`, joined with its product.
    async fn store_product(
        &self,
        store: StoreId,
        id: StoreProductId,
    ) -> Result<Option<StoreProductEntry>, RepositoryError>;

    /// Every link of `store`, featured first, then newest first.
    async fn store_product_entries(
        &self,
        store: StoreId,
    ) -> Result<Vec<StoreProductEntry>, RepositoryError>;

    /// Persist the override fields and flags of a link.
    async fn save_store_product(
        &self,
        link: &StoreProduct,
    ) -> Result<StoreProductEntry, RepositoryError>;

    /// `false` if the link was already gone.
    async fn remove_store_product(
        &self,
        store: StoreId,
        id: StoreProductId,
    ) -> Result<bool, RepositoryError>;

    async fn count_store_products(&self) -> Result<i64, RepositoryError>;
}

/// Everything the application persists.
pub trait Repository:
    UserRepository + CatalogRepository + StoreRepository + StoreProductRepository
{
}

impl<T> Repository for T where
    T: UserRepository + CatalogRepository + StoreRepository + StoreProductRepository
{
}

/// Upper bound on slug suffixes tried before giving up.
pub(crate) const MAX_SLUG_ATTEMPTS: u32 = 1000;

/// Candidate slugs for a new store, in the order they are tried.
pub(crate) fn slug_candidates(store: &NewStore) -> impl Iterator<Item = shopwright_core::Slug> {
    let base = store.base_slug();
    (0..MAX_SLUG_ATTEMPTS).map(move |n| if n == 0 { base.clone() } else { base.with_suffix(n) })
}
