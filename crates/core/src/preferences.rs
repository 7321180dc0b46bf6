//! Visitor preferences: colour theme and favorite products.

use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// Colour theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    /// Flip between light and dark. `System` resolves to dark.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Light | Self::System => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" | "auto" => Ok(Self::System),
            other => Err(format!("invalid theme: {other}")),
        }
    }
}

/// Ordered set of favorite products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites(Vec<ProductId>);

impl Favorites {
    /// Add the product if absent, remove it if present.
    ///
    /// Returns whether the product is a favorite afterwards.
    pub fn toggle(&mut self, product_id: ProductId) -> bool {
        if self.remove(&product_id) {
            false
        } else {
            self.0.push(product_id);
            true
        }
    }

    /// Remove a product; returns whether it was present.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.0.len();
        self.0.retain(|id| id != product_id);
        self.0.len() != before
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.0.contains(product_id)
    }

    /// Favorite product ids in the order they were added.
    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Light.toggle(), Theme::Dark);
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
        assert_eq!(Theme::System.toggle(), Theme::Dark);
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!(" DARK ".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!("auto".parse::<Theme>().unwrap(), Theme::System);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn test_favorites_toggle_keeps_order() {
        let mut favorites = Favorites::default();
        assert!(favorites.toggle(ProductId::new("a")));
        assert!(favorites.toggle(ProductId::new("b")));
        assert!(!favorites.toggle(ProductId::new("a")));
        assert!(favorites.toggle(ProductId::new("a")));
        assert_eq!(
            favorites.ids(),
            &[ProductId::new("b"), ProductId::new("a")]
        );
        assert_eq!(serde_json::to_string(&favorites).unwrap(), r#"["b","a"]"#);
    }
}
