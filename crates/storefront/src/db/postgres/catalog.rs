//! Catalog queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use shopwright_core::{NewProduct, Price, Product, ProductId};

use super::{PgRepository, conflict_on_unique};
use crate::db::{CatalogRepository, RepositoryError};
use crate::models::CatalogQuery;

pub(super) const PRODUCT_COLUMNS: &str = "id, sku, name, description, category, subcategory, \
    cost_price, base_price, suggested_retail, stock_quantity, low_stock_threshold, \
    image_url, images, tags, demand_score, margin_potential, is_active, created_at, updated_at";

#[derive(sqlx::FromRow)]
pub(super) struct ProductRow {
    id: ProductId,
    sku: String,
    name: String,
    description: Option<String>,
    category: String,
    subcategory: Option<String>,
    cost_price: Price,
    base_price: Price,
    suggested_retail: Price,
    stock_quantity: i32,
    low_stock_threshold: i32,
    image_url: Option<String>,
    images: Vec<String>,
    tags: Vec<String>,
    demand_score: f64,
    margin_potential: f64,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            sku: row.sku,
            name: row.name,
            description: row.description,
            category: row.category,
            subcategory: row.subcategory,
            cost_price: row.cost_price,
            base_price: row.base_price,
            suggested_retail: row.suggested_retail,
            stock_quantity: row.stock_quantity,
            low_stock_threshold: row.low_stock_threshold,
            image_url: row.image_url,
            images: row.images,
            tags: row.tags,
            demand_score: row.demand_score,
            margin_potential: row.margin_potential,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `%term%` for ILIKE, with the wildcard characters in `term` escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl CatalogRepository for PgRepository {
    async fn browse_products(&self, query: &CatalogQuery) -> Result<Vec<Product>, RepositoryError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active"
        ));

        if let Some(category) = query.category_filter() {
            qb.push(" AND category = ").push_bind(category.to_owned());
        }
        if let Some(term) = query.search_term() {
            let pattern = like_pattern(term);
            qb.push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(min) = query.min_price {
            qb.push(" AND base_price >= ").push_bind(min);
        }
        if let Some(max) = query.max_price {
            qb.push(" AND base_price <= ").push_bind(max);
        }
        match query.in_stock {
            Some(true) => {
                qb.push(" AND stock_quantity > 0");
            }
            Some(false) => {
                qb.push(" AND stock_quantity = 0");
            }
            None => {}
        }

        qb.push(format!(
            " ORDER BY {} {}, id ASC",
            query.sort_by.column(),
            query.order.as_sql()
        ));
        qb.push(" LIMIT ").push_bind(query.limit());
        qb.push(" OFFSET ").push_bind(query.offset());

        let rows = qb
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Product::from))
    }

    async fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM products WHERE is_active ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (sku, name, description, category, subcategory, cost_price, \
             base_price, suggested_retail, stock_quantity, low_stock_threshold, image_url, \
             images, tags, demand_score, margin_potential) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(&product.subcategory)
        .bind(product.cost_price)
        .bind(product.base_price)
        .bind(product.suggested_retail)
        .bind(product.stock_quantity)
        .bind(product.low_stock_threshold)
        .bind(&product.image_url)
        .bind(&product.images)
        .bind(&product.tags)
        .bind(product.demand_score)
        .bind(product.margin_potential)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "sku already exists"))?;

        Ok(row.into())
    }

    async fn save_product(&self, product: &Product) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET name = $2, description = $3, category = $4, subcategory = $5, \
             cost_price = $6, base_price = $7, suggested_retail = $8, stock_quantity = $9, \
             low_stock_threshold = $10, image_url = $11, images = $12, tags = $13, \
             demand_score = $14, margin_potential = $15, is_active = $16, updated_at = NOW() \
             WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(&product.subcategory)
        .bind(product.cost_price)
        .bind(product.base_price)
        .bind(product.suggested_retail)
        .bind(product.stock_quantity)
        .bind(product.low_stock_threshold)
        .bind(&product.image_url)
        .bind(&product.images)
        .bind(&product.tags)
        .bind(product.demand_score)
        .bind(product.margin_potential)
        .bind(product.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    async fn list_products(&self, include_inactive: bool) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE ($1 OR is_active) \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn top_products_by_demand(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active \
             ORDER BY demand_score DESC, id ASC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn low_stock_products(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_active AND stock_quantity < low_stock_threshold \
             ORDER BY stock_quantity ASC, id ASC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn count_active_products(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
