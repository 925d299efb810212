//! Business logic services for the storefront.
//!
//! Services borrow the repository from `AppState` for the length of one
//! request and hold no state of their own.
//!
//! # Services
//!
//! - `auth` - Registration, password login, role promotion
//! - `authoring` - Owner-scoped store and store-product management
//! - `catalog` - Catalog browsing and admin catalog maintenance
//! - `storefront` - Public storefront resolution by slug
//! - `analytics` - Platform-wide counts for the admin dashboard
//! - `assistant` - Store-building assistant (remote model or keyword rules)

pub mod analytics;
pub mod assistant;
pub mod auth;
pub mod authoring;
pub mod catalog;
pub mod storefront;

pub use analytics::PlatformSummary;
pub use assistant::AssistantService;
pub use auth::{AuthError, AuthService};
pub use authoring::{AuthoringError, AuthoringService};
pub use catalog::{CatalogError, CatalogService};
pub use storefront::{PublicStore, StorefrontPage, resolve_storefront};
