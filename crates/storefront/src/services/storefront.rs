//! Public storefront resolution and the visitor cart flow.

use serde::Serialize;
use tracing::instrument;

use shopwright_core::browsing::{CardEvent, CardState, CartError, VisitorCart};
use shopwright_core::storefront::StorefrontSnapshot;
use shopwright_core::{StoreId, StoreProductId};

use crate::db::{Repository, RepositoryError};

/// Outcome of resolving a slug.
#[derive(Debug, Clone)]
pub enum StorefrontPage {
    Found(PublicStore),
    /// Unknown slug or inactive store. Both render the same not-found page.
    NotFound,
}

/// The public view of a store: its id plus the snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct PublicStore {
    pub id: StoreId,
    #[serde(flatten)]
    pub snapshot: StorefrontSnapshot,
}

/// Load the store with the given slug and project it for visitors.
///
/// # Errors
///
/// Returns `RepositoryError` if the lookup fails.
#[instrument(skip(repo))]
pub async fn resolve_storefront(
    repo: &dyn Repository,
    slug: &str,
) -> Result<StorefrontPage, RepositoryError> {
    let Some(store) = repo.store_by_slug(slug).await?.filter(|s| s.is_active) else {
        return Ok(StorefrontPage::NotFound);
    };

    let entries = repo.store_product_entries(store.id).await?;
    Ok(StorefrontPage::Found(PublicStore {
        id: store.id,
        snapshot: StorefrontSnapshot::assemble(&store, &entries),
    }))
}

/// What happened when the visitor pressed "Add to cart".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOutcome {
    Added { name: String },
    /// The selected product is not on this storefront.
    UnknownProduct,
}

/// Run the add-to-cart transition for `selected` and append it to `cart`.
///
/// # Errors
///
/// Returns `CartError::OutOfStock` if the product has no stock. The cart is
/// left unchanged.
pub fn add_to_cart(
    snapshot: &StorefrontSnapshot,
    cart: &mut VisitorCart,
    selected: StoreProductId,
) -> Result<CartOutcome, CartError> {
    let transition = CardState::Selected(selected).transition(CardEvent::AddToCart);
    let Some(product) = transition.added.and_then(|id| snapshot.find_product(id)) else {
        return Ok(CartOutcome::UnknownProduct);
    };
    cart.add(product)?;
    Ok(CartOutcome::Added {
        name: product.name.clone(),
    })
}
