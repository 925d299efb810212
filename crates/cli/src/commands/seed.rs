//! Seed the shared catalog from a YAML file.
//!
//! ```yaml
//! products:
//!   - sku: AUD-001
//!     name: Wireless Earbuds
//!     category: Audio
//!     cost_price: "12.50"
//!     base_price: "18.00"
//!     suggested_retail: "39.99"
//!     stock_quantity: 120
//!     demand_score: 0.92
//! ```
//!
//! Prices are quoted strings so they keep their exact decimal value. The
//! whole file is validated before anything is written; products whose sku
//! already exists are skipped.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info, warn};

use shopwright_core::NewProduct;
use shopwright_storefront::db::PgRepository;
use shopwright_storefront::services::{CatalogError, CatalogService};

use super::connect;

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub products: Vec<NewProduct>,
}

/// Counts reported after a seed run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Parse and validate a catalog file.
///
/// Every problem is reported, not just the first, as `"<sku>: <reason>"`.
pub fn parse_catalog(content: &str) -> Result<Vec<NewProduct>, Vec<String>> {
    let file: CatalogFile = serde_yaml::from_str(content).map_err(|e| vec![e.to_string()])?;

    let mut products = Vec::with_capacity(file.products.len());
    let mut errors = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for (index, product) in file.products.into_iter().enumerate() {
        let label = if product.sku.trim().is_empty() {
            format!("#{}", index + 1)
        } else {
            product.sku.trim().to_owned()
        };
        match product.normalize() {
            Ok(product) if !seen.insert(product.sku.clone()) => {
                errors.push(format!("{label}: duplicate sku in file"));
            }
            Ok(product) => products.push(product),
            Err(e) => errors.push(format!("{label}: {e}")),
        }
    }

    if errors.is_empty() {
        Ok(products)
    } else {
        Err(errors)
    }
}

/// Load the catalog file at `file_path` into the database.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation, or a
/// database operation other than a duplicate sku fails.
pub async fn catalog(file_path: &str, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");
    let content = tokio::fs::read_to_string(path).await?;

    let products = match parse_catalog(&content) {
        Ok(products) => products,
        Err(errors) => {
            error!("Catalog validation failed:");
            for err in &errors {
                error!("  - {err}");
            }
            return Err(format!("{} validation errors found", errors.len()).into());
        }
    };
    info!(products = products.len(), "Catalog validated");

    if dry_run {
        info!("Dry run, nothing written");
        return Ok(());
    }

    let repo = PgRepository::new(connect().await?);
    let service = CatalogService::new(&repo);
    let mut summary = SeedSummary::default();

    for product in products {
        let sku = product.sku.clone();
        match service.create_product(product).await {
            Ok(_) => summary.inserted += 1,
            Err(CatalogError::Conflict(_)) => {
                warn!(sku = %sku, "sku already exists, skipped");
                summary.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!("Seeding complete!");
    info!("  Products inserted: {}", summary.inserted);
    info!("  Products skipped (already exist): {}", summary.skipped);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const VALID: &str = r#"
products:
  - sku: AUD-001
    name: Wireless Earbuds
    category: Audio
    cost_price: "12.50"
    base_price: "18.00"
    suggested_retail: "39.99"
    stock_quantity: 120
    demand_score: 0.92
  - sku: " HOME-7 "
    name: Desk Lamp
    category: Home
    cost_price: "9.00"
    base_price: "15.00"
    suggested_retail: "29.99"
"#;

    #[test]
    fn test_parse_valid_catalog() {
        let products = parse_catalog(VALID).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].sku, "HOME-7");
        assert_eq!(products[0].suggested_retail.to_string(), "$39.99");
    }

    #[test]
    fn test_parse_reports_every_problem() {
        let yaml = r#"
products:
  - sku: A
    name: ""
    category: Misc
    cost_price: "1.00"
    base_price: "2.00"
    suggested_retail: "3.00"
  - sku: B
    name: Fine
    category: Misc
    cost_price: "1.00"
    base_price: "2.00"
    suggested_retail: "3.00"
    demand_score: 1.5
  - sku: B
    name: Twin
    category: Misc
    cost_price: "1.00"
    base_price: "2.00"
    suggested_retail: "3.00"
"#;
        let errors = parse_catalog(yaml).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("A:"));
        assert!(errors[1].starts_with("B:"));
    }

    #[test]
    fn test_parse_rejects_malformed_yaml() {
        assert_eq!(parse_catalog("products: [").unwrap_err().len(), 1);
    }

    #[test]
    fn test_shipped_catalog_is_valid() {
        let content = include_str!("../../data/catalog.yaml");
        assert!(parse_catalog(content).unwrap().len() >= 10);
    }
}
