//! Public storefront pages at `/s/{slug}`.
//!
//! The product card state comes from the URL: no `product` parameter is
//! the grid, `?product={id}` opens the detail view, and the add-to-cart form
//! posts back and redirects to the grid. The cart is kept per storefront in
//! the visitor's session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use shopwright_core::browsing::{CardState, VisitorCart};
use shopwright_core::storefront::{ResolvedProduct, StorefrontSnapshot};
use shopwright_core::{StoreProductId, TemplateStyle};

use crate::error::AppError;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::models::session::keys;
use crate::services::storefront::{CartOutcome, add_to_cart};
use crate::services::{StorefrontPage, resolve_storefront};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct StorefrontQuery {
    /// Open the detail view for this product.
    pub product: Option<StoreProductId>,
    /// Product just added to the cart.
    pub added: Option<StoreProductId>,
    /// Product that could not be added.
    pub error: Option<StoreProductId>,
}

#[derive(Debug, Deserialize)]
pub struct CartForm {
    pub product_id: StoreProductId,
}

#[derive(Template, WebTemplate)]
#[template(path = "storefront/show.html")]
pub struct StorefrontTemplate {
    pub user: Option<CurrentUser>,
    pub store: StorefrontSnapshot,
    pub style: TemplateStyle,
    pub featured: Vec<ResolvedProduct>,
    pub all_products: Vec<ResolvedProduct>,
    pub selected: Option<ResolvedProduct>,
    pub cart: VisitorCart,
    pub notice: Option<String>,
    pub error: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "storefront/not_found.html")]
pub struct NotFoundTemplate {
    pub user: Option<CurrentUser>,
    pub slug: String,
}

fn not_found(user: Option<CurrentUser>, slug: String) -> Response {
    (StatusCode::NOT_FOUND, NotFoundTemplate { user, slug }).into_response()
}

async fn load_cart(session: &Session, slug: &str) -> VisitorCart {
    session
        .get::<VisitorCart>(&keys::cart(slug))
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Render the storefront, or the not-found page for an unknown or inactive
/// slug.
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Path(slug): Path<String>,
    Query(query): Query<StorefrontQuery>,
) -> Result<Response, AppError> {
    let page = match resolve_storefront(state.repo(), &slug).await? {
        StorefrontPage::Found(page) => page,
        StorefrontPage::NotFound => return Ok(not_found(user, slug)),
    };
    let snapshot = page.snapshot;

    let card = CardState::from_selection(query.product);
    let selected = card
        .selected()
        .and_then(|id| snapshot.find_product(id))
        .cloned();

    let name_of = |id: StoreProductId| snapshot.find_product(id).map(|p| p.name.clone());
    let notice = query
        .added
        .and_then(name_of)
        .map(|name| format!("Added {name} to your cart."));
    let error = query
        .error
        .and_then(name_of)
        .map(|name| format!("{name} is out of stock."));

    let sections = snapshot.sections();
    let featured = sections.featured.into_iter().cloned().collect();
    let all_products = sections.all_products.into_iter().cloned().collect();
    let cart = load_cart(&session, &slug).await;

    Ok(StorefrontTemplate {
        user,
        style: snapshot.style(),
        featured,
        all_products,
        selected,
        cart,
        notice,
        error,
        store: snapshot,
    }
    .into_response())
}

/// Add the selected product to the visitor's cart and return to the grid.
pub async fn add_to_cart_action(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Path(slug): Path<String>,
    Form(form): Form<CartForm>,
) -> Result<Response, AppError> {
    let page = match resolve_storefront(state.repo(), &slug).await? {
        StorefrontPage::Found(page) => page,
        StorefrontPage::NotFound => return Ok(not_found(user, slug)),
    };

    let mut cart = load_cart(&session, &slug).await;
    let back = format!("/s/{slug}");
    let redirect = match add_to_cart(&page.snapshot, &mut cart, form.product_id) {
        Ok(CartOutcome::Added { name }) => {
            session.insert(&keys::cart(&slug), &cart).await?;
            tracing::debug!(slug = %slug, product = %name, items = cart.len(), "added to cart");
            format!("{back}?added={}", form.product_id)
        }
        Ok(CartOutcome::UnknownProduct) => {
            tracing::warn!(slug = %slug, product_id = %form.product_id, "add to cart for unknown product");
            back
        }
        Err(e) => {
            tracing::info!(slug = %slug, error = %e, "add to cart refused");
            format!("{back}?error={}", form.product_id)
        }
    };
    Ok(Redirect::to(&redirect).into_response())
}
