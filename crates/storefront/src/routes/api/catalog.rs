//! Catalog reads for sellers.

use axum::{
    Json,
    extract::{Path, State},
};

use shopwright_core::{Product, ProductId};

use crate::error::AppError;
use crate::models::CatalogQuery;
use crate::services::CatalogService;
use crate::state::AppState;

use super::ApiQuery;

pub async fn browse(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CatalogQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(CatalogService::new(state.repo()).browse(&query).await?))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(CatalogService::new(state.repo()).product(id).await?))
}

pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(CatalogService::new(state.repo()).categories().await?))
}
