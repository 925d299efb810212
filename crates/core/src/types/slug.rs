//! Public URL slugs for stores.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input is empty.
    #[error("slug cannot be empty")]
    Empty,
    /// The input contains a character outside `a-z`, `0-9` and `-`.
    #[error("slug may only contain lowercase letters, digits and hyphens")]
    InvalidCharacter,
    /// The input starts or ends with a hyphen.
    #[error("slug cannot start or end with a hyphen")]
    EdgeHyphen,
}

/// The public path segment of a store (`/s/{slug}`).
///
/// Derived once from the store name at creation and never changed.
///
/// ```
/// use shopwright_core::Slug;
///
/// assert_eq!(Slug::from_name("My Awesome Store").as_str(), "my-awesome-store");
/// assert_eq!(Slug::from_name("Bob's  Bikes_&_Boards!").as_str(), "bobs-bikesboards");
/// assert_eq!(Slug::from_name("my-awesome-store").with_suffix(1).as_str(), "my-awesome-store-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Used when a name contains nothing sluggable, e.g. `"!!!"`.
    pub const FALLBACK: &'static str = "store";

    /// Derive a slug from a display name.
    ///
    /// Lowercases, drops everything except ASCII letters, digits, whitespace
    /// and hyphens, turns each whitespace run into a single `-`, then trims
    /// hyphens from both ends. Underscores are dropped with the punctuation.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let mut out = String::with_capacity(name.len());
        let mut in_gap = false;
        for c in name.chars().flat_map(char::to_lowercase) {
            if c.is_whitespace() {
                in_gap = true;
                continue;
            }
            if !(c.is_ascii_alphanumeric() || c == '-') {
                continue;
            }
            if in_gap {
                out.push('-');
                in_gap = false;
            }
            out.push(c);
        }

        let trimmed = out.trim_matches('-');
        if trimmed.is_empty() {
            Self(Self::FALLBACK.to_owned())
        } else {
            Self(trimmed.to_owned())
        }
    }

    /// Validate an existing slug, e.g. one taken from a URL.
    ///
    /// # Errors
    ///
    /// Returns a [`SlugError`] if the input is not a canonical slug.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(SlugError::InvalidCharacter);
        }
        if s.starts_with('-') || s.ends_with('-') {
            return Err(SlugError::EdgeHyphen);
        }
        Ok(Self(s.to_owned()))
    }

    /// The candidate tried after `n` collisions: `base-n`.
    #[must_use]
    pub fn with_suffix(&self, n: u32) -> Self {
        Self(format!("{}-{n}", self.0))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_basic() {
        assert_eq!(Slug::from_name("My Awesome Store").as_str(), "my-awesome-store");
        assert_eq!(Slug::from_name("  Trailing  ").as_str(), "trailing");
        assert_eq!(Slug::from_name("snake_case_name").as_str(), "snakecasename");
        assert_eq!(Slug::from_name("a_b shop").as_str(), "ab-shop");
        assert_eq!(Slug::from_name("a _ b").as_str(), "a-b");
    }

    #[test]
    fn test_from_name_strips_punctuation() {
        assert_eq!(Slug::from_name("Café & Co.").as_str(), "caf-co");
        assert_eq!(Slug::from_name("-edgy-").as_str(), "edgy");
        assert_eq!(Slug::from_name("Store 2.0").as_str(), "store-20");
    }

    #[test]
    fn test_from_name_keeps_existing_hyphen_runs() {
        assert_eq!(Slug::from_name("a - b").as_str(), "a---b");
    }

    #[test]
    fn test_from_name_falls_back_when_nothing_left() {
        assert_eq!(Slug::from_name("!!!").as_str(), Slug::FALLBACK);
        assert_eq!(Slug::from_name("").as_str(), Slug::FALLBACK);
    }

    #[test]
    fn test_from_name_output_always_parses() {
        for name in ["My Awesome Store", "x", "__a__", "Ünïcödé shop", "???"] {
            let slug = Slug::from_name(name);
            assert_eq!(Slug::parse(slug.as_str()).unwrap(), slug, "{name}");
        }
    }

    #[test]
    fn test_parse_rejects_non_canonical() {
        assert_eq!(Slug::parse(""), Err(SlugError::Empty));
        assert_eq!(Slug::parse("Upper"), Err(SlugError::InvalidCharacter));
        assert_eq!(Slug::parse("has space"), Err(SlugError::InvalidCharacter));
        assert_eq!(Slug::parse("-lead"), Err(SlugError::EdgeHyphen));
    }

    #[test]
    fn test_with_suffix() {
        let base = Slug::from_name("Shop");
        assert_eq!(base.with_suffix(1).as_str(), "shop-1");
        assert_eq!(base.with_suffix(12).as_str(), "shop-12");
    }
}
