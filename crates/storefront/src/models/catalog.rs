//! Catalog browsing parameters.

use serde::Deserialize;

use shopwright_core::{Price, SortOrder};

/// Default page size for catalog listings.
pub const DEFAULT_LIMIT: i64 = 50;
/// Largest page size a caller may ask for.
pub const MAX_LIMIT: i64 = 100;

/// Column to sort catalog listings by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSort {
    Name,
    BasePrice,
    #[default]
    DemandScore,
    CreatedAt,
}

impl CatalogSort {
    /// Column name. Only ever one of a fixed set, so safe to splice into SQL.
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::BasePrice => "base_price",
            Self::DemandScore => "demand_score",
            Self::CreatedAt => "created_at",
        }
    }
}

/// Filters, sort and page for `GET /api/products`.
///
/// Only active products are ever returned by a browse.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    /// Case-insensitive match on name or description.
    pub search: Option<String>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub in_stock: Option<bool>,
    #[serde(default)]
    pub sort_by: CatalogSort,
    #[serde(default)]
    pub order: SortOrder,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl CatalogQuery {
    /// Page size, defaulted and clamped to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    /// Trimmed search text, `None` when blank.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Trimmed category, `None` when blank.
    #[must_use]
    pub fn category_filter(&self) -> Option<&str> {
        self.category.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
