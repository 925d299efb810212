//! The seller's store list and the store editor.
//!
//! Every editor action is a form post that redirects back to the editor, so
//! the page always shows what was persisted. A failed action logs a warning
//! and redirects with an `?error=` code; nothing else changes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use shopwright_core::{
    NewStore, NewStoreProduct, Price, PriceError, Product, ProductId, Store, StoreChanges, StoreId,
    StoreProductChanges, StoreProductEntry, StoreProductId, StoreTemplate,
};

use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::session::keys;
use crate::models::{CatalogQuery, CurrentUser};
use crate::services::assistant::StoreInsights;
use crate::services::{AuthoringError, AuthoringService, CatalogService};
use crate::state::AppState;

/// Catalog rows shown in the editor's import panel.
const CATALOG_PANEL_LIMIT: i64 = 20;

// =============================================================================
// Form and Query Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateStoreForm {
    pub name: String,
    pub description: Option<String>,
    pub template: Option<String>,
    pub primary_color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub name: String,
    pub description: Option<String>,
    pub primary_color: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    /// Checkbox: present when ticked.
    pub is_active: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TemplateForm {
    pub template: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportForm {
    pub product_id: ProductId,
    pub custom_name: Option<String>,
    pub custom_price: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OverrideForm {
    pub custom_name: Option<String>,
    pub custom_price: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeatureForm {
    /// `"true"` to feature, anything else to unfeature.
    pub featured: String,
}

#[derive(Debug, Deserialize)]
pub struct AssistantForm {
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct EditorQuery {
    pub error: Option<String>,
    pub success: Option<String>,
    /// Catalog panel search.
    pub q: Option<String>,
    pub category: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "stores/list.html")]
pub struct StoreListTemplate {
    pub user: Option<CurrentUser>,
    pub stores: Vec<Store>,
    pub templates: Vec<TemplateOption>,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

#[derive(Template, WebTemplate)]
#[template(path = "stores/editor.html")]
pub struct EditorTemplate {
    pub user: Option<CurrentUser>,
    pub store: Store,
    pub templates: Vec<TemplateOption>,
    /// Set when the stored template name is not one of the known templates.
    pub template_fallback: Option<&'static str>,
    pub entries: Vec<StoreProductEntry>,
    pub catalog: Vec<Product>,
    pub categories: Vec<String>,
    pub search: String,
    pub category: String,
    pub insights: StoreInsights,
    pub assistant_reply: Option<String>,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// One choice in the template picker.
pub struct TemplateOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

fn template_options(current: Option<&str>) -> Vec<TemplateOption> {
    let resolved = StoreTemplate::resolve(current);
    StoreTemplate::ALL
        .iter()
        .map(|t| TemplateOption {
            value: t.as_str(),
            label: t.label(),
            selected: *t == resolved,
        })
        .collect()
}

fn error_text(code: &str) -> &'static str {
    match code {
        "invalid_store" => "Check the store name (at least 2 characters) and color (like #6366f1).",
        "invalid_price" => "Prices must be a non-negative amount with at most two decimals, like 19.99.",
        "not_found" => "That store or product could not be found.",
        "conflict" => "That product is already in this store.",
        "empty_message" => "Type a question for the assistant first.",
        "assistant" => "The assistant could not answer right now. Your previous answer is kept.",
        _ => "That did not work. Nothing was changed.",
    }
}

fn success_text(code: &str) -> &'static str {
    match code {
        "created" => "Store created.",
        "saved" => "Settings saved.",
        "template" => "Template updated.",
        "imported" => "Product added to your store.",
        "updated" => "Product updated.",
        "featured" => "Featured products updated.",
        "removed" => "Product removed.",
        "deleted" => "Store deleted.",
        "answered" => "The assistant replied.",
        _ => "Done.",
    }
}

fn error_code(e: &AuthoringError) -> &'static str {
    match e {
        AuthoringError::NotFound(_) => "not_found",
        AuthoringError::InvalidStore(_) | AuthoringError::InvalidProduct(_) => "invalid_store",
        AuthoringError::Validation(_) => "empty_message",
        AuthoringError::Conflict(_) => "conflict",
        AuthoringError::Assistant(_) => "assistant",
        AuthoringError::Repository(_) => "failed",
    }
}

/// Redirect back to the editor after an action.
fn finish<T>(
    store: StoreId,
    action: &'static str,
    result: Result<T, AuthoringError>,
    success: &str,
) -> Redirect {
    match result {
        Ok(_) => {
            let store_id = store.to_string();
            add_breadcrumb("editor", action, Some(&[("store_id", store_id.as_str())]));
            Redirect::to(&format!("/stores/{store}?success={success}"))
        }
        Err(AuthoringError::NotFound(_)) => {
            tracing::warn!(store_id = %store, action, "editor action on missing store or product");
            Redirect::to(&format!("/stores/{store}?error=not_found"))
        }
        Err(e) => {
            tracing::warn!(store_id = %store, action, error = %e, "editor action failed");
            Redirect::to(&format!("/stores/{store}?error={}", error_code(&e)))
        }
    }
}

/// Blank clears the override; anything else must parse as a price.
fn parse_override_price(raw: Option<&str>) -> Result<Option<Price>, PriceError> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Price::parse)
        .transpose()
}

// =============================================================================
// Store List
// =============================================================================

pub async fn list_page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<EditorQuery>,
) -> Result<impl IntoResponse, AppError> {
    let stores = AuthoringService::new(state.repo(), state.assistant())
        .list_my_stores(user.id)
        .await?;

    Ok(StoreListTemplate {
        user: Some(user),
        stores,
        templates: template_options(None),
        error: query.error.as_deref().map(error_text),
        success: query.success.as_deref().map(success_text),
    })
}

pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<CreateStoreForm>,
) -> Redirect {
    let input = NewStore {
        name: form.name,
        description: form.description,
        template: form.template,
        primary_color: form.primary_color,
    };
    match AuthoringService::new(state.repo(), state.assistant())
        .create_store(user.id, input)
        .await
    {
        Ok(store) => Redirect::to(&format!("/stores/{}?success=created", store.id)),
        Err(e) => {
            tracing::warn!(error = %e, "store creation failed");
            Redirect::to(&format!("/stores?error={}", error_code(&e)))
        }
    }
}

// =============================================================================
// Editor
// =============================================================================

pub async fn editor_page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(id): Path<StoreId>,
    Query(query): Query<EditorQuery>,
) -> Result<Response, AppError> {
    let authoring = AuthoringService::new(state.repo(), state.assistant());
    let store = match authoring.load_store(user.id, id).await {
        Ok(store) => store,
        Err(AuthoringError::NotFound(_)) => {
            return Ok(Redirect::to("/stores?error=not_found").into_response());
        }
        Err(e) => return Err(e.into()),
    };
    let entries = authoring.list_store_products(user.id, id).await?;
    let insights = authoring.store_insights(user.id, id).await?;

    let catalog_service = CatalogService::new(state.repo());
    let catalog_query = CatalogQuery {
        search: query.q.clone(),
        category: query.category.clone(),
        limit: Some(CATALOG_PANEL_LIMIT),
        ..CatalogQuery::default()
    };
    let catalog = catalog_service.browse(&catalog_query).await?;
    let categories = catalog_service.categories().await?;

    let assistant_reply = session
        .get::<String>(&keys::assistant_reply(id))
        .await
        .ok()
        .flatten();

    let template_fallback = store
        .template
        .parse::<StoreTemplate>()
        .is_err()
        .then(|| StoreTemplate::default().label());

    Ok(EditorTemplate {
        user: Some(user),
        templates: template_options(Some(&store.template)),
        template_fallback,
        store,
        entries,
        catalog,
        categories,
        search: query.q.unwrap_or_default(),
        category: query.category.unwrap_or_default(),
        insights,
        assistant_reply,
        error: query.error.as_deref().map(error_text),
        success: query.success.as_deref().map(success_text),
    }
    .into_response())
}

pub async fn update_settings(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<StoreId>,
    Form(form): Form<SettingsForm>,
) -> Redirect {
    let changes = StoreChanges {
        name: Some(form.name),
        description: Some(form.description.unwrap_or_default()),
        primary_color: form.primary_color.filter(|c| !c.trim().is_empty()),
        logo_url: Some(form.logo_url.unwrap_or_default()),
        banner_url: Some(form.banner_url.unwrap_or_default()),
        is_active: Some(form.is_active.is_some()),
        ..StoreChanges::default()
    };
    let result = AuthoringService::new(state.repo(), state.assistant())
        .update_store(user.id, id, &changes)
        .await;
    finish(id, "Saved store settings", result, "saved")
}

pub async fn update_template(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<StoreId>,
    Form(form): Form<TemplateForm>,
) -> Redirect {
    let result = AuthoringService::new(state.repo(), state.assistant())
        .update_store(user.id, id, &StoreChanges::template(form.template))
        .await;
    finish(id, "Changed template", result, "template")
}

pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<StoreId>,
) -> Redirect {
    match AuthoringService::new(state.repo(), state.assistant())
        .delete_store(user.id, id)
        .await
    {
        Ok(()) => Redirect::to("/stores?success=deleted"),
        Err(e) => {
            tracing::warn!(store_id = %id, error = %e, "store deletion failed");
            Redirect::to(&format!("/stores?error={}", error_code(&e)))
        }
    }
}

pub async fn import_product(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<StoreId>,
    Form(form): Form<ImportForm>,
) -> Redirect {
    let custom_price = match parse_override_price(form.custom_price.as_deref()) {
        Ok(price) => price,
        Err(e) => {
            tracing::info!(store_id = %id, error = %e, "override price refused");
            return Redirect::to(&format!("/stores/{id}?error=invalid_price"));
        }
    };
    let input = NewStoreProduct {
        product_id: form.product_id,
        custom_name: form.custom_name,
        custom_price,
        is_featured: false,
    };
    let result = AuthoringService::new(state.repo(), state.assistant())
        .import_product(user.id, id, input)
        .await;
    finish(id, "Imported product", result, "imported")
}

pub async fn update_product(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((id, sp)): Path<(StoreId, StoreProductId)>,
    Form(form): Form<OverrideForm>,
) -> Redirect {
    let custom_price = match parse_override_price(form.custom_price.as_deref()) {
        Ok(price) => price,
        Err(e) => {
            tracing::info!(store_id = %id, error = %e, "override price refused");
            return Redirect::to(&format!("/stores/{id}?error=invalid_price"));
        }
    };
    let changes = StoreProductChanges {
        custom_name: Some(form.custom_name),
        custom_price: Some(custom_price),
        ..StoreProductChanges::default()
    };
    let result = AuthoringService::new(state.repo(), state.assistant())
        .update_store_product(user.id, id, sp, &changes)
        .await;
    finish(id, "Updated product overrides", result, "updated")
}

pub async fn feature_product(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((id, sp)): Path<(StoreId, StoreProductId)>,
    Form(form): Form<FeatureForm>,
) -> Redirect {
    let result = AuthoringService::new(state.repo(), state.assistant())
        .set_featured(user.id, id, sp, form.featured == "true")
        .await;
    finish(id, "Toggled featured", result, "featured")
}

pub async fn remove_product(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((id, sp)): Path<(StoreId, StoreProductId)>,
) -> Redirect {
    let result = AuthoringService::new(state.repo(), state.assistant())
        .remove_product(user.id, id, sp)
        .await;
    finish(id, "Removed product", result, "removed")
}

/// Ask the assistant and keep its answer for this store's editor. On failure
/// the previous answer stays in the session untouched.
pub async fn ask_assistant(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(id): Path<StoreId>,
    Form(form): Form<AssistantForm>,
) -> Redirect {
    let result = AuthoringService::new(state.repo(), state.assistant())
        .ask_assistant(&user, Some(id), &form.message, &[])
        .await;

    match result {
        Ok(reply) => {
            let kept = session
                .insert(&keys::assistant_reply(id), reply.response)
                .await;
            if let Err(e) = kept {
                tracing::warn!(store_id = %id, error = %e, "could not keep assistant reply");
                return Redirect::to(&format!("/stores/{id}?error=failed"));
            }
            finish(id, "Asked assistant", Ok(()), "answered")
        }
        Err(e) => finish::<()>(id, "Asked assistant", Err(e), "answered"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_template_options_mark_resolved_choice() {
        let options = template_options(Some("nonexistent"));
        let selected: Vec<&str> = options.iter().filter(|o| o.selected).map(|o| o.value).collect();
        assert_eq!(selected, ["modern"]);

        let options = template_options(Some("bold"));
        assert!(options.iter().any(|o| o.value == "bold" && o.selected));
    }

    #[test]
    fn test_override_price_parsing() {
        assert_eq!(parse_override_price(None), Ok(None));
        assert_eq!(parse_override_price(Some("  ")), Ok(None));
        assert_eq!(
            parse_override_price(Some("24.00")),
            Ok(Some(Price::parse("24.00").unwrap()))
        );
        assert_eq!(parse_override_price(Some("-1")), Err(PriceError::Negative));
        assert_eq!(parse_override_price(Some("19.999")), Err(PriceError::TooPrecise));
        assert_eq!(parse_override_price(Some("100000000")), Err(PriceError::TooLarge));
        assert!(parse_override_price(Some("abc")).is_err());
    }
}
