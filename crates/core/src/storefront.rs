//! The public storefront projection.
//!
//! A [`StorefrontSnapshot`] is what an anonymous visitor sees for a slug. It
//! is rebuilt from the store and its associations on every read and carries
//! overrides already applied, so rendering never looks at catalog records.

use serde::Serialize;

use crate::types::{Price, Store, StoreProductEntry, StoreProductId, StoreTemplate, TemplateStyle};

/// A product as shown on a public storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedProduct {
    /// The association id, which is what the cart and detail view refer to.
    pub id: StoreProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub category: String,
    pub image_url: Option<String>,
    pub images: Vec<String>,
    pub is_featured: bool,
    pub in_stock: bool,
}

impl From<&StoreProductEntry> for ResolvedProduct {
    fn from(entry: &StoreProductEntry) -> Self {
        Self {
            id: entry.link.id,
            name: entry.effective_name.clone(),
            description: entry.product.description.clone(),
            price: entry.effective_price,
            category: entry.product.category.clone(),
            image_url: entry.product.image_url.clone(),
            images: entry.product.images.clone(),
            is_featured: entry.link.is_featured,
            in_stock: entry.product.in_stock(),
        }
    }
}

/// Read-only public view of a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorefrontSnapshot {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// The stored template name, unresolved.
    pub template: String,
    pub primary_color: String,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub products: Vec<ResolvedProduct>,
}

/// Products split into the two storefront sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sections<'a> {
    pub featured: Vec<&'a ResolvedProduct>,
    pub all_products: Vec<&'a ResolvedProduct>,
}

impl<'a> Sections<'a> {
    /// Split `products` into Featured and All Products.
    ///
    /// When at least one product is featured, All Products holds only the
    /// rest, so every product appears exactly once. When none is featured,
    /// All Products holds everything.
    #[must_use]
    pub fn partition(products: &'a [ResolvedProduct]) -> Self {
        let (featured, rest): (Vec<_>, Vec<_>) = products.iter().partition(|p| p.is_featured);
        if featured.is_empty() {
            Self {
                featured,
                all_products: products.iter().collect(),
            }
        } else {
            Self {
                featured,
                all_products: rest,
            }
        }
    }
}

impl StorefrontSnapshot {
    /// Build the snapshot from a store and its joined associations.
    ///
    /// Inactive associations and inactive catalog products are dropped.
    /// Entry order is kept.
    #[must_use]
    pub fn assemble(store: &Store, entries: &[StoreProductEntry]) -> Self {
        let products = entries
            .iter()
            .filter(|e| e.link.is_active && e.product.is_active)
            .map(ResolvedProduct::from)
            .collect();

        Self {
            name: store.name.clone(),
            slug: store.slug.as_str().to_owned(),
            description: store.description.clone(),
            template: store.template.clone(),
            primary_color: store.primary_color.clone(),
            logo_url: store.logo_url.clone(),
            banner_url: store.banner_url.clone(),
            products,
        }
    }

    #[must_use]
    pub fn resolved_template(&self) -> StoreTemplate {
        StoreTemplate::resolve(Some(&self.template))
    }

    #[must_use]
    pub fn style(&self) -> TemplateStyle {
        self.resolved_template().style()
    }

    #[must_use]
    pub fn sections(&self) -> Sections<'_> {
        Sections::partition(&self.products)
    }

    #[must_use]
    pub fn find_product(&self, id: StoreProductId) -> Option<&ResolvedProduct> {
        self.products.iter().find(|p| p.id == id)
    }
}
