//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                   - Landing page
//!
//! # Auth
//! GET  /auth/login, POST /auth/login       - Login form
//! GET  /auth/register, POST /auth/register - Registration form
//! POST /auth/logout                        - Logout
//!
//! # Editor (requires auth)
//! GET  /stores                             - My stores + create form
//! POST /stores                             - Create store
//! GET  /stores/{id}                        - Store editor
//! POST /stores/{id}/settings               - Save settings
//! POST /stores/{id}/template               - Switch template
//! POST /stores/{id}/delete                 - Delete store
//! POST /stores/{id}/products               - Import a catalog product
//! POST /stores/{id}/products/{sp}/update   - Save name/price overrides
//! POST /stores/{id}/products/{sp}/feature  - Feature or unfeature
//! POST /stores/{id}/products/{sp}/remove   - Remove from store
//! POST /stores/{id}/assistant              - Ask the assistant
//!
//! # Public storefront
//! GET  /s/{slug}                           - Product grid
//! GET  /s/{slug}?product={sp}              - Product detail
//! POST /s/{slug}/cart                      - Add to cart
//!
//! # JSON API
//! /api/...                                 - See `api`
//! ```

pub mod api;
pub mod auth;
pub mod home;
pub mod storefront;
pub mod stores;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the store editor routes router.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(stores::list_page).post(stores::create))
        .route("/{id}", get(stores::editor_page))
        .route("/{id}/settings", post(stores::update_settings))
        .route("/{id}/template", post(stores::update_template))
        .route("/{id}/delete", post(stores::delete))
        .route("/{id}/products", post(stores::import_product))
        .route("/{id}/products/{sp}/update", post(stores::update_product))
        .route("/{id}/products/{sp}/feature", post(stores::feature_product))
        .route("/{id}/products/{sp}/remove", post(stores::remove_product))
        .route("/{id}/assistant", post(stores::ask_assistant))
}

/// Create the public storefront routes router.
pub fn storefront_routes() -> Router<AppState> {
    Router::new()
        .route("/{slug}", get(storefront::show))
        .route("/{slug}/cart", post(storefront::add_to_cart_action))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/auth", auth_routes())
        .nest("/stores", store_routes())
        .nest("/s", storefront_routes())
        .nest("/api", api::routes())
}
