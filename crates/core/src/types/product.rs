//! Catalog products and their per-store associations.
//!
//! A [`Product`] belongs to the shared catalog and is edited only by admins.
//! A [`StoreProduct`] links a product into one store and may override the two
//! fields a seller controls: the display name and the price. Everything else
//! shown on a storefront comes from the catalog product.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{Price, ProductId, StoreId, StoreProductId};

/// Errors raised when validating catalog product fields.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ProductError {
    #[error("sku cannot be empty")]
    EmptySku,
    #[error("product name cannot be empty")]
    EmptyName,
    #[error("demand score must be between 0 and 1, got {0}")]
    DemandOutOfRange(f64),
    #[error("stock quantity cannot be negative")]
    NegativeStock,
}

/// Default threshold below which stock counts as low.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;
/// Demand score assigned when none is given.
pub const DEFAULT_DEMAND_SCORE: f64 = 0.5;
/// Margin potential assigned when none is given.
pub const DEFAULT_MARGIN_POTENTIAL: f64 = 0.3;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub cost_price: Price,
    pub base_price: Price,
    pub suggested_retail: Price,
    pub stock_quantity: i32,
    pub low_stock_threshold: i32,
    pub image_url: Option<String>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub demand_score: f64,
    pub margin_potential: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.stock_quantity < self.low_stock_threshold
    }
}

/// Input for adding a product to the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    pub cost_price: Price,
    pub base_price: Price,
    pub suggested_retail: Price,
    #[serde(default)]
    pub stock_quantity: i32,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_demand_score")]
    pub demand_score: f64,
    #[serde(default = "default_margin_potential")]
    pub margin_potential: f64,
}

const fn default_low_stock_threshold() -> i32 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

const fn default_demand_score() -> f64 {
    DEFAULT_DEMAND_SCORE
}

const fn default_margin_potential() -> f64 {
    DEFAULT_MARGIN_POTENTIAL
}

impl NewProduct {
    /// Validate and trim the input.
    ///
    /// # Errors
    ///
    /// Returns a [`ProductError`] for a blank sku or name, a demand score
    /// outside `[0, 1]`, or negative stock.
    pub fn normalize(mut self) -> Result<Self, ProductError> {
        self.sku = self.sku.trim().to_owned();
        self.name = self.name.trim().to_owned();
        self.category = self.category.trim().to_owned();
        if self.sku.is_empty() {
            return Err(ProductError::EmptySku);
        }
        if self.name.is_empty() {
            return Err(ProductError::EmptyName);
        }
        check_demand(self.demand_score)?;
        check_stock(self.stock_quantity)?;
        Ok(self)
    }
}

/// A partial update to a catalog product.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub cost_price: Option<Price>,
    pub base_price: Option<Price>,
    pub suggested_retail: Option<Price>,
    pub stock_quantity: Option<i32>,
    pub low_stock_threshold: Option<i32>,
    pub image_url: Option<String>,
    pub images: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub demand_score: Option<f64>,
    pub margin_potential: Option<f64>,
    pub is_active: Option<bool>,
}

impl ProductChanges {
    /// Validate and apply the change. Leaves `product` untouched on error.
    ///
    /// # Errors
    ///
    /// Returns a [`ProductError`] for a blank name, a demand score outside
    /// `[0, 1]`, or negative stock.
    pub fn apply(&self, product: &mut Product) -> Result<(), ProductError> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err(ProductError::EmptyName);
        }
        if let Some(score) = self.demand_score {
            check_demand(score)?;
        }
        if let Some(stock) = self.stock_quantity {
            check_stock(stock)?;
        }

        if let Some(name) = &self.name {
            product.name = name.trim().to_owned();
        }
        if let Some(description) = &self.description {
            product.description = Some(description.clone()).filter(|d| !d.trim().is_empty());
        }
        if let Some(category) = &self.category {
            product.category = category.trim().to_owned();
        }
        if let Some(subcategory) = &self.subcategory {
            product.subcategory = Some(subcategory.clone()).filter(|s| !s.trim().is_empty());
        }
        if let Some(price) = self.cost_price {
            product.cost_price = price;
        }
        if let Some(price) = self.base_price {
            product.base_price = price;
        }
        if let Some(price) = self.suggested_retail {
            product.suggested_retail = price;
        }
        if let Some(stock) = self.stock_quantity {
            product.stock_quantity = stock;
        }
        if let Some(threshold) = self.low_stock_threshold {
            product.low_stock_threshold = threshold;
        }
        if let Some(image) = &self.image_url {
            product.image_url = Some(image.clone()).filter(|i| !i.trim().is_empty());
        }
        if let Some(images) = &self.images {
            product.images.clone_from(images);
        }
        if let Some(tags) = &self.tags {
            product.tags.clone_from(tags);
        }
        if let Some(score) = self.demand_score {
            product.demand_score = score;
        }
        if let Some(margin) = self.margin_potential {
            product.margin_potential = margin;
        }
        if let Some(active) = self.is_active {
            product.is_active = active;
        }
        Ok(())
    }
}

fn check_demand(score: f64) -> Result<(), ProductError> {
    if (0.0..=1.0).contains(&score) {
        Ok(())
    } else {
        Err(ProductError::DemandOutOfRange(score))
    }
}

const fn check_stock(stock: i32) -> Result<(), ProductError> {
    if stock < 0 {
        Err(ProductError::NegativeStock)
    } else {
        Ok(())
    }
}

// =============================================================================
// Store associations
// =============================================================================

/// A catalog product linked into a store, with the seller's overrides.
///
/// At most one association exists per (store, product) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreProduct {
    pub id: StoreProductId,
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub custom_name: Option<String>,
    pub custom_price: Option<Price>,
    pub is_featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl StoreProduct {
    /// The name shown for this product: the override if set, else the catalog name.
    #[must_use]
    pub fn effective_name<'a>(&'a self, product: &'a Product) -> &'a str {
        self.custom_name.as_deref().unwrap_or(&product.name)
    }

    /// The price charged for this product: the override if set, else the
    /// catalog's suggested retail price.
    #[must_use]
    pub fn effective_price(&self, product: &Product) -> Price {
        self.custom_price.unwrap_or(product.suggested_retail)
    }
}

/// An association joined with its catalog product and resolved overrides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreProductEntry {
    #[serde(flatten)]
    pub link: StoreProduct,
    pub product: Product,
    pub effective_name: String,
    pub effective_price: Price,
}

impl StoreProductEntry {
    #[must_use]
    pub fn resolve(link: StoreProduct, product: Product) -> Self {
        let effective_name = link.effective_name(&product).to_owned();
        let effective_price = link.effective_price(&product);
        Self {
            link,
            product,
            effective_name,
            effective_price,
        }
    }

    /// Featured first, then newest first.
    pub fn sort_for_listing(entries: &mut [Self]) {
        entries.sort_by(|a, b| {
            b.link
                .is_featured
                .cmp(&a.link.is_featured)
                .then_with(|| b.link.created_at.cmp(&a.link.created_at))
                .then_with(|| b.link.id.cmp(&a.link.id))
        });
    }
}

/// Input for importing a catalog product into a store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStoreProduct {
    pub product_id: ProductId,
    #[serde(default)]
    pub custom_name: Option<String>,
    #[serde(default)]
    pub custom_price: Option<Price>,
    #[serde(default)]
    pub is_featured: bool,
}

impl NewStoreProduct {
    /// Import without overrides.
    #[must_use]
    pub const fn plain(product_id: ProductId) -> Self {
        Self {
            product_id,
            custom_name: None,
            custom_price: None,
            is_featured: false,
        }
    }

    /// Drop a blank custom name so it falls back to the catalog name.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        self.custom_name = normalize_custom_name(self.custom_name);
        self
    }
}

/// A partial update to an association.
///
/// For the override fields, a missing key leaves the value alone while an
/// explicit `null` (or a blank name) clears the override.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreProductChanges {
    #[serde(default, deserialize_with = "deserialize_some")]
    pub custom_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub custom_price: Option<Option<Price>>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
}

impl StoreProductChanges {
    /// A change that only sets the featured flag.
    #[must_use]
    pub fn featured(featured: bool) -> Self {
        Self {
            is_featured: Some(featured),
            ..Self::default()
        }
    }

    pub fn apply(&self, link: &mut StoreProduct) {
        if let Some(name) = &self.custom_name {
            link.custom_name = normalize_custom_name(name.clone());
        }
        if let Some(price) = self.custom_price {
            link.custom_price = price;
        }
        if let Some(featured) = self.is_featured {
            link.is_featured = featured;
        }
        if let Some(active) = self.is_active {
            link.is_active = active;
        }
    }
}

fn normalize_custom_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_owned()).filter(|n| !n.is_empty())
}

/// Distinguishes a present `null` from a missing key.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
