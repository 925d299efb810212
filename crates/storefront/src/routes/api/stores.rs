//! Store and store-product endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use shopwright_core::{
    NewStore, NewStoreProduct, Store, StoreChanges, StoreId, StoreProductChanges,
    StoreProductEntry, StoreProductId,
};

use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::services::{AuthoringService, PublicStore, StorefrontPage, resolve_storefront};
use crate::state::AppState;

use super::ApiJson;

fn authoring(state: &AppState) -> AuthoringService<'_> {
    AuthoringService::new(state.repo(), state.assistant())
}

pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(body): ApiJson<NewStore>,
) -> Result<(StatusCode, Json<Store>), AppError> {
    let store = authoring(&state).create_store(user.id, body).await?;
    Ok((StatusCode::CREATED, Json(store)))
}

pub async fn list_mine(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Store>>, AppError> {
    Ok(Json(authoring(&state).list_my_stores(user.id).await?))
}

pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<StoreId>,
) -> Result<Json<Store>, AppError> {
    Ok(Json(authoring(&state).load_store(user.id, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<StoreId>,
    ApiJson(changes): ApiJson<StoreChanges>,
) -> Result<Json<Store>, AppError> {
    Ok(Json(
        authoring(&state).update_store(user.id, id, &changes).await?,
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<StoreId>,
) -> Result<Json<Value>, AppError> {
    authoring(&state).delete_store(user.id, id).await?;
    Ok(Json(json!({ "message": "Store deleted" })))
}

/// Public snapshot. No authentication.
pub async fn public(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PublicStore>, AppError> {
    match resolve_storefront(state.repo(), &slug).await? {
        StorefrontPage::Found(store) => Ok(Json(store)),
        StorefrontPage::NotFound => Err(AppError::NotFound("Store not found".to_string())),
    }
}

pub async fn list_products(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<StoreId>,
) -> Result<Json<Vec<StoreProductEntry>>, AppError> {
    Ok(Json(
        authoring(&state).list_store_products(user.id, id).await?,
    ))
}

pub async fn import_product(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<StoreId>,
    ApiJson(body): ApiJson<NewStoreProduct>,
) -> Result<(StatusCode, Json<StoreProductEntry>), AppError> {
    let entry = authoring(&state).import_product(user.id, id, body).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_product(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((id, sp_id)): Path<(StoreId, StoreProductId)>,
    ApiJson(changes): ApiJson<StoreProductChanges>,
) -> Result<Json<StoreProductEntry>, AppError> {
    Ok(Json(
        authoring(&state)
            .update_store_product(user.id, id, sp_id, &changes)
            .await?,
    ))
}

/// Succeeds whether or not the link still existed.
pub async fn remove_product(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((id, sp_id)): Path<(StoreId, StoreProductId)>,
) -> Result<Json<Value>, AppError> {
    authoring(&state).remove_product(user.id, id, sp_id).await?;
    Ok(Json(json!({ "message": "Product removed from store" })))
}
