//! Seller-owned stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Slug, StoreId, StoreTemplate, UserId};

/// Errors raised when validating store fields.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store name must be at least {min} characters")]
    NameTooShort { min: usize },
    #[error("store name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("primary color must be a hex color like #6366f1")]
    InvalidColor,
}

/// Minimum store name length, in characters, after trimming.
pub const MIN_NAME_LENGTH: usize = 2;
/// Maximum store name length, in characters, after trimming.
pub const MAX_NAME_LENGTH: usize = 100;
/// Color used when a store does not pick one.
pub const DEFAULT_PRIMARY_COLOR: &str = "#6366f1";

/// A store as persisted.
///
/// `template` keeps whatever the owner submitted; rendering resolves it with
/// [`StoreTemplate::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub owner_id: UserId,
    pub name: String,
    pub slug: Slug,
    pub description: Option<String>,
    pub template: String,
    pub primary_color: String,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    /// The template this store renders with.
    #[must_use]
    pub fn resolved_template(&self) -> StoreTemplate {
        StoreTemplate::resolve(Some(&self.template))
    }

    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner_id == user
    }
}

/// Input for creating a store. The slug is assigned by the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStore {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
}

impl NewStore {
    /// Validate and normalize the input in place.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] for a short or long name or a malformed color.
    pub fn normalize(mut self) -> Result<Self, StoreError> {
        self.name = validate_name(&self.name)?;
        self.description = non_blank(self.description);
        self.template = non_blank(self.template);
        self.primary_color = match non_blank(self.primary_color) {
            Some(color) => Some(validate_color(&color)?),
            None => None,
        };
        Ok(self)
    }

    /// Template name to persist.
    #[must_use]
    pub fn template_or_default(&self) -> String {
        self.template
            .clone()
            .unwrap_or_else(|| StoreTemplate::default().as_str().to_owned())
    }

    /// Primary color to persist.
    #[must_use]
    pub fn color_or_default(&self) -> String {
        self.primary_color
            .clone()
            .unwrap_or_else(|| DEFAULT_PRIMARY_COLOR.to_owned())
    }

    /// Slug derived from the name, before collision suffixes.
    #[must_use]
    pub fn base_slug(&self) -> Slug {
        Slug::from_name(&self.name)
    }
}

/// A partial update to a store. Absent fields are left alone.
///
/// Blank `description`, `logo_url` and `banner_url` clear the field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub template: Option<String>,
    pub primary_color: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub is_active: Option<bool>,
}

impl StoreChanges {
    /// A change that only switches the template.
    #[must_use]
    pub fn template(name: impl Into<String>) -> Self {
        Self {
            template: Some(name.into()),
            ..Self::default()
        }
    }

    /// Validate and apply the change to `store`.
    ///
    /// Leaves `store` untouched when validation fails.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] for a short or long name or a malformed color.
    pub fn apply(&self, store: &mut Store) -> Result<(), StoreError> {
        let name = self.name.as_deref().map(validate_name).transpose()?;
        let color = self.primary_color.as_deref().map(validate_color).transpose()?;

        if let Some(name) = name {
            store.name = name;
        }
        if let Some(color) = color {
            store.primary_color = color;
        }
        if let Some(description) = &self.description {
            store.description = non_blank(Some(description.clone()));
        }
        if let Some(template) = &self.template {
            store.template = template.trim().to_owned();
        }
        if let Some(logo) = &self.logo_url {
            store.logo_url = non_blank(Some(logo.clone()));
        }
        if let Some(banner) = &self.banner_url {
            store.banner_url = non_blank(Some(banner.clone()));
        }
        if let Some(active) = self.is_active {
            store.is_active = active;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String, StoreError> {
    let name = name.trim();
    let len = name.chars().count();
    if len < MIN_NAME_LENGTH {
        return Err(StoreError::NameTooShort {
            min: MIN_NAME_LENGTH,
        });
    }
    if len > MAX_NAME_LENGTH {
        return Err(StoreError::NameTooLong {
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(name.to_owned())
}

/// Accepts `#rgb` or `#rrggbb`, returned lowercased.
fn validate_color(color: &str) -> Result<String, StoreError> {
    let color = color.trim();
    let hex = color.strip_prefix('#').ok_or(StoreError::InvalidColor)?;
    if !matches!(hex.len(), 3 | 6) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(StoreError::InvalidColor);
    }
    Ok(color.to_ascii_lowercase())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn store() -> Store {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Store {
            id: StoreId::new(1),
            owner_id: UserId::new(1),
            name: "My Awesome Store".to_owned(),
            slug: Slug::from_name("My Awesome Store"),
            description: Some("Things".to_owned()),
            template: "modern".to_owned(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_owned(),
            logo_url: None,
            banner_url: None,
            is_active: true,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_new_store_normalizes() {
        let input = NewStore {
            name: "  Corner Shop ".to_owned(),
            description: Some("   ".to_owned()),
            template: None,
            primary_color: Some("#ABC".to_owned()),
        }
        .normalize()
        .unwrap();
        assert_eq!(input.name, "Corner Shop");
        assert_eq!(input.description, None);
        assert_eq!(input.primary_color.as_deref(), Some("#abc"));
        assert_eq!(input.template_or_default(), "modern");
        assert_eq!(input.base_slug().as_str(), "corner-shop");
    }

    #[test]
    fn test_new_store_rejects_short_name() {
        let input = NewStore {
            name: " a ".to_owned(),
            description: None,
            template: None,
            primary_color: None,
        };
        assert_eq!(
            input.normalize().unwrap_err(),
            StoreError::NameTooShort { min: 2 }
        );
    }

    #[test]
    fn test_changes_apply_subset() {
        let mut s = store();
        StoreChanges::template("bold").apply(&mut s).unwrap();
        assert_eq!(s.template, "bold");
        assert_eq!(s.name, "My Awesome Store");
        assert_eq!(s.resolved_template(), StoreTemplate::Bold);
    }

    #[test]
    fn test_changes_accept_unknown_template() {
        let mut s = store();
        StoreChanges::template("nonexistent").apply(&mut s).unwrap();
        assert_eq!(s.template, "nonexistent");
        assert_eq!(s.resolved_template(), StoreTemplate::Modern);
    }

    #[test]
    fn test_changes_blank_clears_optional_fields() {
        let mut s = store();
        let changes = StoreChanges {
            description: Some(String::new()),
            logo_url: Some("https://cdn.example.com/logo.png".to_owned()),
            ..StoreChanges::default()
        };
        changes.apply(&mut s).unwrap();
        assert_eq!(s.description, None);
        assert_eq!(s.logo_url.as_deref(), Some("https://cdn.example.com/logo.png"));
    }

    #[test]
    fn test_invalid_change_leaves_store_untouched() {
        let mut s = store();
        let before = s.clone();
        let changes = StoreChanges {
            name: Some("Renamed".to_owned()),
            primary_color: Some("red".to_owned()),
            ..StoreChanges::default()
        };
        assert_eq!(changes.apply(&mut s), Err(StoreError::InvalidColor));
        assert_eq!(s, before);
    }

    #[test]
    fn test_slug_is_not_changeable() {
        let mut s = store();
        let changes = StoreChanges {
            name: Some("Something Else".to_owned()),
            ..StoreChanges::default()
        };
        changes.apply(&mut s).unwrap();
        assert_eq!(s.slug.as_str(), "my-awesome-store");
    }
}
