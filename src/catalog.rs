//! Product catalog.
//!
//! The catalog is read-only reference data: sections of products keyed by
//! category, loaded from a YAML fixture. The `regalos` section doubles as
//! the candidate pool for the free-gift policy.

use std::{fs, io, path::Path};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The fixture file could not be read.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The fixture contents were not valid catalog YAML.
    #[error(transparent)]
    Yaml(#[from] serde_norway::Error),
}

/// Storefront sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Camisetas deportivas.
    #[serde(rename = "camisetas")]
    Shirts,

    /// Tenis.
    #[serde(rename = "tenis")]
    Sneakers,

    /// Jeans.
    #[serde(rename = "jeans")]
    Jeans,

    /// Cascos de moto.
    #[serde(rename = "cascos")]
    Helmets,

    /// Artículos deportivos.
    #[serde(rename = "deportes")]
    Sports,

    /// Regalos: the gift candidate pool.
    #[serde(rename = "regalos")]
    Gifts,
}

impl Category {
    /// Display title in storefront copy.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Shirts => "Camisetas",
            Self::Sneakers => "Tenis",
            Self::Jeans => "Jeans",
            Self::Helmets => "Cascos",
            Self::Sports => "Deportes",
            Self::Gifts => "Regalos",
        }
    }
}

/// A product in the catalog, priced in COP minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Identifier, unique across the catalog.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Normal unit price in COP minor units.
    pub price: i64,

    /// Image path, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// Creates a product without an image.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: None,
        }
    }

    /// Attaches an image path.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Read-only access to catalog sections.
pub trait CatalogProvider {
    /// Products in a category, in display order. Empty when the category has
    /// no section.
    fn products(&self, category: Category) -> &[Product];

    /// Candidate pool for the free-gift policy.
    fn gift_candidates(&self) -> &[Product] {
        self.products(Category::Gifts)
    }
}

/// A catalog indexed by category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    sections: FxHashMap<Category, Vec<Product>>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a catalog from YAML fixture contents.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Yaml`] if the contents do not parse as a map
    /// of category sections.
    pub fn from_yaml(contents: &str) -> Result<Self, CatalogError> {
        let sections = serde_norway::from_str(contents)?;

        Ok(Self { sections })
    }

    /// Loads a catalog from a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read and
    /// [`CatalogError::Yaml`] if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Replaces a section's products.
    pub fn set_section(&mut self, category: Category, products: Vec<Product>) {
        self.sections.insert(category, products);
    }
}

impl CatalogProvider for Catalog {
    fn products(&self, category: Category) -> &[Product] {
        self.sections.get(&category).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_sections_from_yaml() -> TestResult {
        let catalog = Catalog::from_yaml(
            r#"
camisetas:
  - id: camiseta-1
    name: "Camiseta Nike Dri-FIT"
    price: 55000
    image: "camiseta-nike.webp"
regalos:
  - id: regalo-1
    name: "Gorra Adidas"
    price: 80000
"#,
        )?;

        let shirts = catalog.products(Category::Shirts);
        assert_eq!(shirts.len(), 1);
        assert_eq!(
            shirts.first().map(|p| p.price),
            Some(55_000),
            "shirt price should come from the fixture"
        );

        assert_eq!(catalog.gift_candidates().len(), 1);

        Ok(())
    }

    #[test]
    fn missing_sections_are_empty() {
        let catalog = Catalog::new();

        assert!(catalog.products(Category::Helmets).is_empty());
        assert!(catalog.gift_candidates().is_empty());
    }

    #[test]
    fn invalid_yaml_surfaces_a_parse_error() {
        let result = Catalog::from_yaml("camisetas: not-a-list");

        assert!(
            matches!(result, Err(CatalogError::Yaml(_))),
            "expected Yaml error, got {result:?}"
        );
    }

    #[test]
    fn bundled_fixture_loads_and_covers_every_section() -> TestResult {
        let catalog = Catalog::load(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/fixtures/catalog.yml"
        ))?;

        for category in [
            Category::Shirts,
            Category::Sneakers,
            Category::Jeans,
            Category::Helmets,
            Category::Sports,
            Category::Gifts,
        ] {
            assert!(
                !catalog.products(category).is_empty(),
                "fixture should stock {}",
                category.title()
            );
        }

        Ok(())
    }
}
