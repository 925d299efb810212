//! Store/product link queries.
//!
//! Every read joins the link with its catalog product so callers always get
//! a resolved [`StoreProductEntry`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use shopwright_core::{
    NewStoreProduct, Price, Product, StoreId, StoreProduct, StoreProductEntry, StoreProductId,
};

use super::catalog::ProductRow;
use super::{PgRepository, conflict_on_unique};
use crate::db::{RepositoryError, StoreProductRepository};

/// Link columns are aliased so they do not collide with the product's.
const ENTRY_COLUMNS: &str = "sp.id AS link_id, sp.store_id, sp.custom_name, sp.custom_price, \
    sp.is_featured, sp.is_active AS link_active, sp.created_at AS link_created_at, \
    p.id, p.sku, p.name, p.description, p.category, p.subcategory, p.cost_price, \
    p.base_price, p.suggested_retail, p.stock_quantity, p.low_stock_threshold, \
    p.image_url, p.images, p.tags, p.demand_score, p.margin_potential, p.is_active, \
    p.created_at, p.updated_at";

#[derive(sqlx::FromRow)]
struct EntryRow {
    link_id: StoreProductId,
    store_id: StoreId,
    custom_name: Option<String>,
    custom_price: Option<Price>,
    is_featured: bool,
    link_active: bool,
    link_created_at: DateTime<Utc>,
    #[sqlx(flatten)]
    product: ProductRow,
}

impl From<EntryRow> for StoreProductEntry {
    fn from(row: EntryRow) -> Self {
        let product = Product::from(row.product);
        let link = StoreProduct {
            id: row.link_id,
            store_id: row.store_id,
            product_id: product.id,
            custom_name: row.custom_name,
            custom_price: row.custom_price,
            is_featured: row.is_featured,
            is_active: row.link_active,
            created_at: row.link_created_at,
        };
        Self::resolve(link, product)
    }
}

#[async_trait]
impl StoreProductRepository for PgRepository {
    async fn add_store_product(
        &self,
        store: StoreId,
        input: &NewStoreProduct,
    ) -> Result<StoreProductEntry, RepositoryError> {
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            "WITH sp AS ( \
                INSERT INTO store_products (store_id, product_id, custom_name, custom_price, is_featured) \
                VALUES ($1, $2, $3, $4, $5) RETURNING * \
             ) \
             SELECT {ENTRY_COLUMNS} FROM sp JOIN products p ON p.id = sp.product_id"
        ))
        .bind(store)
        .bind(input.product_id)
        .bind(&input.custom_name)
        .bind(input.custom_price)
        .bind(input.is_featured)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            conflict_on_unique(e, "product already in store")
        })?;

        Ok(row.into())
    }

    async fn store_product(
        &self,
        store: StoreId,
        id: StoreProductId,
    ) -> Result<Option<StoreProductEntry>, RepositoryError> {
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM store_products sp \
             JOIN products p ON p.id = sp.product_id \
             WHERE sp.store_id = $1 AND sp.id = $2"
        ))
        .bind(store)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(StoreProductEntry::from))
    }

    async fn store_product_entries(
        &self,
        store: StoreId,
    ) -> Result<Vec<StoreProductEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM store_products sp \
             JOIN products p ON p.id = sp.product_id \
             WHERE sp.store_id = $1 \
             ORDER BY sp.is_featured DESC, sp.created_at DESC, sp.id DESC"
        ))
        .bind(store)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(StoreProductEntry::from).collect())
    }

    async fn save_store_product(
        &self,
        link: &StoreProduct,
    ) -> Result<StoreProductEntry, RepositoryError> {
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            "WITH sp AS ( \
                UPDATE store_products SET custom_name = $3, custom_price = $4, \
                is_featured = $5, is_active = $6 \
                WHERE store_id = $1 AND id = $2 RETURNING * \
             ) \
             SELECT {ENTRY_COLUMNS} FROM sp JOIN products p ON p.id = sp.product_id"
        ))
        .bind(link.store_id)
        .bind(link.id)
        .bind(&link.custom_name)
        .bind(link.custom_price)
        .bind(link.is_featured)
        .bind(link.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    async fn remove_store_product(
        &self,
        store: StoreId,
        id: StoreProductId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM store_products WHERE store_id = $1 AND id = $2")
            .bind(store)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_store_products(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM store_products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
