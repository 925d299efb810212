//! Assistant chat, product recommendations and store insights.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use shopwright_core::StoreId;

use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::services::AuthoringService;
use crate::services::assistant::{ChatReply, HistoryTurn, Recommendations, StoreInsights};
use crate::state::AppState;

use super::ApiJson;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub store_id: Option<StoreId>,
    #[serde(default)]
    pub conversation_history: Vec<HistoryTurn>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub query: String,
    #[serde(default)]
    pub store_id: Option<StoreId>,
}

pub async fn recommend(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(body): ApiJson<RecommendRequest>,
) -> Result<Json<Recommendations>, AppError> {
    let recommendations = AuthoringService::new(state.repo(), state.assistant())
        .recommend(user.id, body.store_id, &body.query)
        .await?;
    Ok(Json(recommendations))
}

pub async fn chat(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(body): ApiJson<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let reply = AuthoringService::new(state.repo(), state.assistant())
        .ask_assistant(&user, body.store_id, &body.message, &body.conversation_history)
        .await?;
    Ok(Json(reply))
}

pub async fn insights(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(store_id): Path<StoreId>,
) -> Result<Json<StoreInsights>, AppError> {
    Ok(Json(
        AuthoringService::new(state.repo(), state.assistant())
            .store_insights(user.id, store_id)
            .await?,
    ))
}
