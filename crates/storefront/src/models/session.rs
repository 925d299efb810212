//! Session-related types.
//!
//! Types stored in the session for authentication state and per-visitor
//! storefront state.

use serde::{Deserialize, Serialize};

use shopwright_core::{Email, StoreId, UserId, UserRole};

use super::User;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
    /// Full name or email local part, captured at login.
    pub display_name: String,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            display_name: user.display_name().to_owned(),
        }
    }
}

/// Session keys.
pub mod keys {
    use super::StoreId;

    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Visitor cart for one storefront.
    #[must_use]
    pub fn cart(slug: &str) -> String {
        format!("cart:{slug}")
    }

    /// Last assistant response shown in one store's editor.
    #[must_use]
    pub fn assistant_reply(store: StoreId) -> String {
        format!("assistant:{store}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_scoped() {
        assert_eq!(keys::cart("corner-shop"), "cart:corner-shop");
        assert_ne!(
            keys::assistant_reply(StoreId::new(1)),
            keys::assistant_reply(StoreId::new(2))
        );
    }
}
