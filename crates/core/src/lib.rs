//! Shopwright Core - Shared types library.
//!
//! This crate provides the types and pure rules used across all Shopwright
//! components:
//! - `storefront` - Seller-facing authoring API and public storefront pages
//! - `cli` - Command-line tools for migrations, catalog seeding, and user management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere, including in tests that never touch a database.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers and records: IDs, prices, emails, slugs,
//!   templates, stores, catalog products, and store-product associations
//! - [`storefront`] - The public snapshot projection and featured/regular partitioning
//! - [`browsing`] - Product card state machine and the visitor cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod browsing;
pub mod storefront;
pub mod types;

pub use types::*;
