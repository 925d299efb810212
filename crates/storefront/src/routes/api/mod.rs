//! JSON API under `/api`.
//!
//! Session-cookie authenticated except registration, login, the catalog
//! reads and the public storefront snapshot. Errors are
//! `{"message": "..."}` bodies produced by [`AppError`](crate::error::AppError).

pub mod admin;
pub mod assistant;
pub mod auth;
pub mod catalog;
pub mod stores;

use axum::{
    Router,
    extract::{FromRequest, FromRequestParts},
    routing::{get, post, put},
};

use crate::error::AppError;
use crate::state::AppState;

/// `axum::Json` whose rejections are `{"message"}` bodies with status 400.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Query` with the same rejection shape as [`ApiJson`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/stores", store_routes())
        .nest("/products", catalog_routes())
        .nest("/ai", assistant_routes())
        .nest("/admin", admin_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(stores::create))
        .route("/my", get(stores::list_mine))
        .route("/public/{slug}", get(stores::public))
        .route(
            "/{id}",
            get(stores::show).put(stores::update).delete(stores::delete),
        )
        .route(
            "/{id}/products",
            get(stores::list_products).post(stores::import_product),
        )
        .route(
            "/{id}/products/{sp_id}",
            put(stores::update_product).delete(stores::remove_product),
        )
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::browse))
        .route("/categories/list", get(catalog::categories))
        .route("/{id}", get(catalog::show))
}

fn assistant_routes() -> Router<AppState> {
    Router::new()
        .route("/recommend", post(assistant::recommend))
        .route("/chat", post(assistant::chat))
        .route("/insights/{store_id}", get(assistant::insights))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(admin::list_products).post(admin::create_product),
        )
        .route(
            "/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/analytics", get(admin::analytics))
        .route("/users/{id}/make-admin", post(admin::make_admin))
}
