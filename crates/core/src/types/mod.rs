//! Core types for Shopwright.
//!
//! This module provides type-safe wrappers for common domain concepts and the
//! plain value records shared by the repository implementations.

pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod slug;
pub mod status;
pub mod store;
pub mod template;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use product::{
    NewProduct, NewStoreProduct, Product, ProductChanges, ProductError, StoreProduct,
    StoreProductChanges, StoreProductEntry,
};
pub use slug::{Slug, SlugError};
pub use status::*;
pub use store::{NewStore, Store, StoreChanges, StoreError};
pub use template::{StoreTemplate, TemplateStyle};
