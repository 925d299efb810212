//! Shopwright storefront library.
//!
//! The seller-facing authoring API and editor, the public storefront pages,
//! and the admin catalog endpoints. Built as a library so the binary, the CLI
//! and the integration tests share one router and one repository layer.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use app::build_app;
