//! Platform-wide numbers for the admin dashboard.

use serde::Serialize;

use shopwright_core::{Price, ProductId};

use crate::db::{Repository, RepositoryError};

/// How many low-stock products the summary lists.
pub const LOW_STOCK_LIMIT: i64 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct LowStockProduct {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub stock_quantity: i32,
    pub low_stock_threshold: i32,
    pub base_price: Price,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformSummary {
    pub total_users: i64,
    pub total_stores: i64,
    pub total_products: i64,
    pub total_store_products: i64,
    pub low_stock_products: Vec<LowStockProduct>,
}

/// Gather the dashboard counts.
///
/// # Errors
///
/// Returns `RepositoryError` if any count fails.
pub async fn platform_summary(repo: &dyn Repository) -> Result<PlatformSummary, RepositoryError> {
    let low_stock_products = repo
        .low_stock_products(LOW_STOCK_LIMIT)
        .await?
        .into_iter()
        .map(|p| LowStockProduct {
            id: p.id,
            sku: p.sku,
            name: p.name,
            stock_quantity: p.stock_quantity,
            low_stock_threshold: p.low_stock_threshold,
            base_price: p.base_price,
        })
        .collect();

    Ok(PlatformSummary {
        total_users: repo.count_users().await?,
        total_stores: repo.count_stores().await?,
        total_products: repo.count_active_products().await?,
        total_store_products: repo.count_store_products().await?,
        low_stock_products,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopwright_core::NewProduct;

    use super::*;
    use crate::db::{CatalogRepository, MemoryRepository};

    fn product(sku: &str, stock: i32) -> NewProduct {
        NewProduct {
            sku: sku.to_string(),
            name: sku.to_string(),
            description: None,
            category: "Misc".to_string(),
            subcategory: None,
            cost_price: Price::from_cents(100),
            base_price: Price::from_cents(200),
            suggested_retail: Price::from_cents(400),
            stock_quantity: stock,
            low_stock_threshold: 10,
            image_url: None,
            images: Vec::new(),
            tags: Vec::new(),
            demand_score: 0.1,
            margin_potential: 0.1,
        }
    }

    #[tokio::test]
    async fn test_summary_counts_and_low_stock() {
        let repo = MemoryRepository::new();
        repo.create_product(product("FULL", 50)).await.unwrap();
        repo.create_product(product("LOW", 3)).await.unwrap();

        let summary = platform_summary(&repo).await.unwrap();
        assert_eq!(summary.total_products, 2);
        assert_eq!(summary.total_stores, 0);
        assert_eq!(summary.low_stock_products.len(), 1);
        assert_eq!(summary.low_stock_products[0].sku, "LOW");
    }
}
