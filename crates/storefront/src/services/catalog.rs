//! Catalog browsing and admin catalog maintenance.

use thiserror::Error;
use tracing::instrument;

use shopwright_core::{NewProduct, Product, ProductChanges, ProductError, ProductId};

use crate::db::{Repository, RepositoryError};
use crate::models::CatalogQuery;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product not found")]
    NotFound,

    #[error(transparent)]
    Invalid(#[from] ProductError),

    #[error("{0}")]
    Conflict(String),

    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for CatalogError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Conflict(message) => Self::Conflict(message),
            other => Self::Repository(other),
        }
    }
}

/// Catalog reads for sellers and writes for admins.
pub struct CatalogService<'a> {
    repo: &'a dyn Repository,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(repo: &'a dyn Repository) -> Self {
        Self { repo }
    }

    /// Active products matching the query.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn browse(&self, query: &CatalogQuery) -> Result<Vec<Product>, CatalogError> {
        Ok(self.repo.browse_products(query).await?)
    }

    /// An active product. Inactive products are hidden from sellers.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for unknown or inactive products.
    pub async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.repo
            .product_by_id(id)
            .await?
            .filter(|p| p.is_active)
            .ok_or(CatalogError::NotFound)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.repo.categories().await?)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` for bad fields, `CatalogError::Conflict`
    /// for a duplicate sku.
    #[instrument(skip(self, input), fields(sku = %input.sku))]
    pub async fn create_product(&self, input: NewProduct) -> Result<Product, CatalogError> {
        let product = self.repo.create_product(input.normalize()?).await?;
        tracing::info!(product_id = %product.id, "catalog product created");
        Ok(product)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` or `CatalogError::Invalid`.
    #[instrument(skip(self, changes))]
    pub async fn update_product(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<Product, CatalogError> {
        let mut product = self
            .repo
            .product_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound)?;
        changes.apply(&mut product)?;
        Ok(self.repo.save_product(&product).await?)
    }

    /// Soft delete. Existing store links stay but stop rendering.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for unknown products.
    #[instrument(skip(self))]
    pub async fn deactivate_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let changes = ProductChanges {
            is_active: Some(false),
            ..ProductChanges::default()
        };
        self.update_product(id, &changes).await
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list_products(&self, include_inactive: bool) -> Result<Vec<Product>, CatalogError> {
        Ok(self.repo.list_products(include_inactive).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopwright_core::Price;

    use super::*;
    use crate::db::MemoryRepository;

    fn input(sku: &str) -> NewProduct {
        NewProduct {
            sku: sku.to_string(),
            name: "Cable".to_string(),
            description: None,
            category: "Charging".to_string(),
            subcategory: None,
            cost_price: Price::from_cents(100),
            base_price: Price::from_cents(300),
            suggested_retail: Price::from_cents(799),
            stock_quantity: 20,
            low_stock_threshold: 10,
            image_url: None,
            images: Vec::new(),
            tags: Vec::new(),
            demand_score: 0.5,
            margin_potential: 0.3,
        }
    }

    #[tokio::test]
    async fn test_duplicate_sku_conflicts() {
        let repo = MemoryRepository::new();
        let svc = CatalogService::new(&repo);
        svc.create_product(input("USB-C-1")).await.unwrap();
        assert!(matches!(
            svc.create_product(input(" USB-C-1 ")).await,
            Err(CatalogError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_deactivated_product_hidden_from_sellers() {
        let repo = MemoryRepository::new();
        let svc = CatalogService::new(&repo);
        let product = svc.create_product(input("USB-C-1")).await.unwrap();
        svc.deactivate_product(product.id).await.unwrap();

        assert!(matches!(svc.product(product.id).await, Err(CatalogError::NotFound)));
        assert!(svc.categories().await.unwrap().is_empty());
        assert_eq!(svc.list_products(true).await.unwrap().len(), 1);
        assert!(svc.list_products(false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_validates() {
        let repo = MemoryRepository::new();
        let svc = CatalogService::new(&repo);
        let product = svc.create_product(input("USB-C-1")).await.unwrap();
        let changes = ProductChanges {
            demand_score: Some(2.0),
            ..ProductChanges::default()
        };
        assert!(matches!(
            svc.update_product(product.id, &changes).await,
            Err(CatalogError::Invalid(ProductError::DemandOutOfRange(_)))
        ));
    }
}
