//! Domain models that live in the storefront crate rather than core.
//!
//! Core holds the store and catalog records. What is here is either tied to
//! authentication, to the session, or to query parameters the HTTP layer
//! parses.

pub mod catalog;
pub mod session;
pub mod user;

pub use catalog::{CatalogQuery, CatalogSort};
pub use session::CurrentUser;
pub use user::{NewUser, User};
