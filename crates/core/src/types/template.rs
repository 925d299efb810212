//! Storefront visual templates.
//!
//! A store records its template as free text. Rendering resolves that text
//! against the closed set below and falls back to [`StoreTemplate::Modern`]
//! for anything it does not recognize, so an unknown value never breaks a
//! public page.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of storefront templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreTemplate {
    #[default]
    Modern,
    Minimal,
    Bold,
}

impl StoreTemplate {
    /// All templates, in picker order.
    pub const ALL: [Self; 3] = [Self::Modern, Self::Minimal, Self::Bold];

    /// Resolve a stored template name, falling back to `Modern`.
    ///
    /// ```
    /// use shopwright_core::StoreTemplate;
    ///
    /// assert_eq!(StoreTemplate::resolve(Some("bold")), StoreTemplate::Bold);
    /// assert_eq!(StoreTemplate::resolve(Some("nonexistent")), StoreTemplate::Modern);
    /// assert_eq!(StoreTemplate::resolve(None), StoreTemplate::Modern);
    /// ```
    #[must_use]
    pub fn resolve(name: Option<&str>) -> Self {
        name.and_then(|n| n.parse().ok()).unwrap_or_default()
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Minimal => "minimal",
            Self::Bold => "bold",
        }
    }

    /// Human-readable label for the template picker.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Modern => "Modern",
            Self::Minimal => "Minimal",
            Self::Bold => "Bold",
        }
    }

    /// The visual style this template renders with.
    #[must_use]
    pub const fn style(&self) -> TemplateStyle {
        match self {
            Self::Modern => TemplateStyle {
                template: Self::Modern,
                page: "tpl-modern",
                header: "tpl-modern__header",
                card: "tpl-modern__card",
                button: "tpl-modern__button",
            },
            Self::Minimal => TemplateStyle {
                template: Self::Minimal,
                page: "tpl-minimal",
                header: "tpl-minimal__header",
                card: "tpl-minimal__card",
                button: "tpl-minimal__button",
            },
            Self::Bold => TemplateStyle {
                template: Self::Bold,
                page: "tpl-bold",
                header: "tpl-bold__header",
                card: "tpl-bold__card",
                button: "tpl-bold__button",
            },
        }
    }
}

impl fmt::Display for StoreTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "modern" => Ok(Self::Modern),
            "minimal" => Ok(Self::Minimal),
            "bold" => Ok(Self::Bold),
            other => Err(format!("unknown template: {other}")),
        }
    }
}

/// CSS classes a storefront page is rendered with.
///
/// Two stores whose templates resolve to the same [`StoreTemplate`] get equal
/// styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateStyle {
    pub template: StoreTemplate,
    pub page: &'static str,
    pub header: &'static str,
    pub card: &'static str,
    pub button: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_names() {
        assert_eq!(StoreTemplate::resolve(Some("modern")), StoreTemplate::Modern);
        assert_eq!(StoreTemplate::resolve(Some("minimal")), StoreTemplate::Minimal);
        assert_eq!(StoreTemplate::resolve(Some(" Bold ")), StoreTemplate::Bold);
    }

    #[test]
    fn test_unknown_template_styles_like_modern() {
        let fallback = StoreTemplate::resolve(Some("nonexistent")).style();
        assert_eq!(fallback, StoreTemplate::resolve(Some("modern")).style());
        assert_eq!(StoreTemplate::resolve(Some("")).style(), fallback);
        assert_eq!(StoreTemplate::resolve(None).style(), fallback);
    }

    #[test]
    fn test_styles_are_distinct() {
        let pages: Vec<_> = StoreTemplate::ALL.iter().map(|t| t.style().page).collect();
        assert_eq!(pages, ["tpl-modern", "tpl-minimal", "tpl-bold"]);
    }

    #[test]
    fn test_as_str_round_trips_through_resolve() {
        for template in StoreTemplate::ALL {
            assert_eq!(StoreTemplate::resolve(Some(template.as_str())), template);
        }
    }
}
