//! Visitor-side browsing: the product card state machine and the cart.
//!
//! ```text
//! Browsing --Open(id)--> Selected(id) --AddToCart--> Browsing (+ cart append)
//!                            |
//!                            +--------Dismiss-------> Browsing
//! ```
//!
//! There is no checkout state. The cart only ever grows.

use serde::{Deserialize, Serialize};

use crate::storefront::ResolvedProduct;
use crate::types::{Price, StoreProductId};

/// What the visitor is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CardState {
    #[default]
    Browsing,
    /// Detail view open for one product.
    Selected(StoreProductId),
}

/// Something the visitor did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEvent {
    Open(StoreProductId),
    Dismiss,
    AddToCart,
}

/// Result of feeding an event to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: CardState,
    /// Set when the transition passed through `Added`.
    pub added: Option<StoreProductId>,
}

impl CardState {
    /// Detail view for `?product=` if given, otherwise the grid.
    #[must_use]
    pub fn from_selection(selected: Option<StoreProductId>) -> Self {
        selected.map_or(Self::Browsing, Self::Selected)
    }

    /// Apply `event`. Events that make no sense in the current state leave
    /// it unchanged.
    #[must_use]
    pub const fn transition(self, event: CardEvent) -> Transition {
        match (self, event) {
            (Self::Browsing, CardEvent::Open(id)) => Transition {
                next: Self::Selected(id),
                added: None,
            },
            (Self::Selected(_), CardEvent::Dismiss) => Transition {
                next: Self::Browsing,
                added: None,
            },
            (Self::Selected(id), CardEvent::AddToCart) => Transition {
                next: Self::Browsing,
                added: Some(id),
            },
            (state, _) => Transition {
                next: state,
                added: None,
            },
        }
    }

    #[must_use]
    pub const fn selected(&self) -> Option<StoreProductId> {
        match self {
            Self::Browsing => None,
            Self::Selected(id) => Some(*id),
        }
    }
}

/// Errors from adding to the cart.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("{name} is out of stock")]
    OutOfStock { name: String },
}

/// A line in the visitor cart, captured at the time it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: StoreProductId,
    pub name: String,
    pub price: Price,
}

/// The visitor's cart for one storefront.
///
/// Held in the visitor's session only. Never persisted with the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorCart {
    items: Vec<CartItem>,
}

impl VisitorCart {
    /// Append a product. Adding the same product twice gives two lines.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] if the product has no stock.
    pub fn add(&mut self, product: &ResolvedProduct) -> Result<(), CartError> {
        if !product.in_stock {
            return Err(CartError::OutOfStock {
                name: product.name.clone(),
            });
        }
        self.items.push(CartItem {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
        });
        Ok(())
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of the line prices. Stops at the last total that fit a decimal.
    #[must_use]
    pub fn total(&self) -> Price {
        let mut total = Price::ZERO;
        for item in &self.items {
            match total.checked_add(item.price) {
                Some(next) => total = next,
                None => break,
            }
        }
        total
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i32, in_stock: bool) -> ResolvedProduct {
        ResolvedProduct {
            id: StoreProductId::new(id),
            name: format!("Item {id}"),
            description: None,
            price: Price::from_cents(1250),
            category: "General".to_owned(),
            image_url: None,
            images: Vec::new(),
            is_featured: false,
            in_stock,
        }
    }

    #[test]
    fn test_open_then_dismiss() {
        let id = StoreProductId::new(3);
        let open = CardState::Browsing.transition(CardEvent::Open(id));
        assert_eq!(open.next, CardState::Selected(id));
        let back = open.next.transition(CardEvent::Dismiss);
        assert_eq!(back, Transition { next: CardState::Browsing, added: None });
    }

    #[test]
    fn test_add_returns_to_browsing() {
        let id = StoreProductId::new(3);
        let t = CardState::Selected(id).transition(CardEvent::AddToCart);
        assert_eq!(t.next, CardState::Browsing);
        assert_eq!(t.added, Some(id));
    }

    #[test]
    fn test_invalid_events_are_ignored() {
        let id = StoreProductId::new(1);
        let other = StoreProductId::new(2);
        assert_eq!(
            CardState::Browsing.transition(CardEvent::AddToCart).next,
            CardState::Browsing
        );
        assert_eq!(
            CardState::Browsing.transition(CardEvent::Dismiss).next,
            CardState::Browsing
        );
        let t = CardState::Selected(id).transition(CardEvent::Open(other));
        assert_eq!(t.next, CardState::Selected(id));
        assert_eq!(t.added, None);
    }

    #[test]
    fn test_from_selection() {
        assert_eq!(CardState::from_selection(None), CardState::Browsing);
        let id = StoreProductId::new(9);
        assert_eq!(CardState::from_selection(Some(id)).selected(), Some(id));
    }

    #[test]
    fn test_cart_appends_in_order_with_duplicates() {
        let mut cart = VisitorCart::default();
        cart.add(&product(1, true)).unwrap();
        cart.add(&product(2, true)).unwrap();
        cart.add(&product(1, true)).unwrap();
        let ids: Vec<i32> = cart.items().iter().map(|i| i.id.as_i32()).collect();
        assert_eq!(ids, [1, 2, 1]);
        assert_eq!(cart.total(), Price::from_cents(3750));
    }

    #[test]
    fn test_cart_total_of_max_prices() {
        let mut cart = VisitorCart::default();
        let mut expensive = product(1, true);
        expensive.price = Price::MAX;
        cart.add(&expensive).unwrap();
        cart.add(&expensive).unwrap();
        assert_eq!(
            cart.total().amount(),
            Price::MAX.amount() + Price::MAX.amount()
        );
        assert_eq!(cart.total().to_string(), "$199999999.98");
    }

    #[test]
    fn test_cart_rejects_out_of_stock() {
        let mut cart = VisitorCart::default();
        let err = cart.add(&product(5, false)).unwrap_err();
        assert_eq!(err, CartError::OutOfStock { name: "Item 5".to_owned() });
        assert!(cart.is_empty());
    }
}
