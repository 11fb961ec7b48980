//! Helmet customization pricing.
//!
//! Customized helmets are priced as the base product plus design and text
//! surcharges, and enter the cart as their own `-custom` line so they never
//! merge with the stock helmet.

use crate::{catalog::Product, items::LineItem};

/// Paint design for a customized helmet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelmetDesign {
    /// Single color, no surcharge.
    Solid,

    /// Racing stripes.
    Stripes,

    /// Camouflage pattern.
    Camouflage,

    /// Fully custom artwork.
    Custom,
}

impl HelmetDesign {
    /// Surcharge in COP minor units.
    #[must_use]
    pub fn surcharge(self) -> i64 {
        match self {
            Self::Solid => 0,
            Self::Stripes => 20_000,
            Self::Camouflage => 30_000,
            Self::Custom => 50_000,
        }
    }

    /// Storefront label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Solid => "sólido",
            Self::Stripes => "rayas",
            Self::Camouflage => "camuflaje",
            Self::Custom => "personalizado",
        }
    }
}

/// A shopper's helmet customization choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelmetCustomization {
    /// Base color name.
    pub color: String,

    /// Paint design.
    pub design: HelmetDesign,

    /// Custom text printed on the helmet, if any.
    pub custom_text: Option<String>,
}

impl HelmetCustomization {
    /// Surcharge for printed text in COP minor units.
    pub const TEXT_SURCHARGE: i64 = 15_000;

    /// Total surcharge over the base helmet price.
    #[must_use]
    pub fn surcharge(&self) -> i64 {
        let text = self.text().map_or(0, |_| Self::TEXT_SURCHARGE);

        self.design.surcharge() + text
    }

    /// Display name carrying the choices.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut name = format!("Casco Personalizado ({}, {})", self.color, self.design.label());

        if let Some(text) = self.text() {
            name.push_str(&format!(" - \"{text}\""));
        }

        name
    }

    /// Builds the cart line for this customization on a base helmet.
    #[must_use]
    pub fn line_item(&self, base: &Product) -> LineItem {
        LineItem::new(
            format!("{}-custom", base.id),
            self.display_name(),
            base.price + self.surcharge(),
            base.image.clone(),
        )
    }

    /// Custom text with whitespace-only entries treated as absent.
    fn text(&self) -> Option<&str> {
        self.custom_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}
