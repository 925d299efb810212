//! Admin-only catalog maintenance, analytics and user promotion.
//!
//! Every handler takes [`RequireAdmin`]; sellers get 403.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use shopwright_core::{NewProduct, Product, ProductChanges, ProductId, UserId};

use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::User;
use crate::services::analytics::{self, PlatformSummary};
use crate::services::{AuthService, CatalogService};
use crate::state::AppState;

use super::{ApiJson, ApiQuery};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

pub async fn list_products(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(
        CatalogService::new(state.repo())
            .list_products(query.include_inactive)
            .await?,
    ))
}

pub async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(body): ApiJson<NewProduct>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = CatalogService::new(state.repo()).create_product(body).await?;
    tracing::info!(admin_id = %admin.id, product_id = %product.id, "admin created product");
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
    ApiJson(changes): ApiJson<ProductChanges>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(
        CatalogService::new(state.repo())
            .update_product(id, &changes)
            .await?,
    ))
}

/// Soft delete: the product is deactivated, never removed.
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, AppError> {
    let product = CatalogService::new(state.repo())
        .deactivate_product(id)
        .await?;
    tracing::info!(admin_id = %admin.id, product_id = %id, "admin deactivated product");
    Ok(Json(product))
}

pub async fn analytics(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<PlatformSummary>, AppError> {
    Ok(Json(analytics::platform_summary(state.repo()).await?))
}

pub async fn make_admin(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<Json<User>, AppError> {
    let user = AuthService::new(state.repo()).promote_to_admin(id).await?;
    tracing::info!(admin_id = %admin.id, user_id = %id, "user promoted to admin");
    Ok(Json(user))
}
