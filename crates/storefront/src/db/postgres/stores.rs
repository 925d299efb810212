//! Store queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use shopwright_core::{NewStore, Slug, Store, StoreId, UserId};

use super::PgRepository;
use crate::db::{RepositoryError, StoreRepository, slug_candidates};

const STORE_COLUMNS: &str = "id, owner_id, name, slug, description, template, primary_color, \
    logo_url, banner_url, is_active, created_at, updated_at";

const SLUG_CONSTRAINT: &str = "stores_slug_key";

#[derive(sqlx::FromRow)]
struct StoreRow {
    id: StoreId,
    owner_id: UserId,
    name: String,
    slug: String,
    description: Option<String>,
    template: String,
    primary_color: String,
    logo_url: Option<String>,
    banner_url: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StoreRow> for Store {
    type Error = RepositoryError;

    fn try_from(row: StoreRow) -> Result<Self, Self::Error> {
        let slug = Slug::parse(&row.slug).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid slug in database: {e}"))
        })?;
        Ok(Self {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            slug,
            description: row.description,
            template: row.template,
            primary_color: row.primary_color,
            logo_url: row.logo_url,
            banner_url: row.banner_url,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl StoreRepository for PgRepository {
    async fn create_store(&self, owner: UserId, store: &NewStore) -> Result<Store, RepositoryError> {
        let sql = format!(
            "INSERT INTO stores (owner_id, name, slug, description, template, primary_color) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {STORE_COLUMNS}"
        );

        // The unique constraint arbitrates between concurrent creators; a
        // losing insert moves on to the next suffix.
        for slug in slug_candidates(store) {
            let result = sqlx::query_as::<_, StoreRow>(&sql)
                .bind(owner)
                .bind(&store.name)
                .bind(slug.as_str())
                .bind(&store.description)
                .bind(store.template_or_default())
                .bind(store.color_or_default())
                .fetch_one(&self.pool)
                .await;

            match result {
                Ok(row) => return row.try_into(),
                Err(sqlx::Error::Database(db_err))
                    if db_err.is_unique_violation()
                        && db_err.constraint() == Some(SLUG_CONSTRAINT) =>
                {
                    tracing::debug!(slug = %slug, "slug taken, trying next suffix");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(RepositoryError::Conflict("no free slug for this store name".to_owned()))
    }

    async fn store_by_id(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        sqlx::query_as::<_, StoreRow>(&format!("SELECT {STORE_COLUMNS} FROM stores WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Store::try_from)
            .transpose()
    }

    async fn store_by_slug(&self, slug: &str) -> Result<Option<Store>, RepositoryError> {
        sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?
        .map(Store::try_from)
        .transpose()
    }

    async fn stores_by_owner(&self, owner: UserId) -> Result<Vec<Store>, RepositoryError> {
        sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE owner_id = $1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Store::try_from)
        .collect()
    }

    async fn save_store(&self, store: &Store) -> Result<Store, RepositoryError> {
        sqlx::query_as::<_, StoreRow>(&format!(
            "UPDATE stores SET name = $2, description = $3, template = $4, primary_color = $5, \
             logo_url = $6, banner_url = $7, is_active = $8, updated_at = NOW() \
             WHERE id = $1 RETURNING {STORE_COLUMNS}"
        ))
        .bind(store.id)
        .bind(&store.name)
        .bind(&store.description)
        .bind(&store.template)
        .bind(&store.primary_color)
        .bind(&store.logo_url)
        .bind(&store.banner_url)
        .bind(store.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?
        .try_into()
    }

    async fn delete_store(&self, id: StoreId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM stores WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_stores(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stores")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
