//! Cart line items.

use serde::{Deserialize, Serialize};

/// A single line in a cart or order.
///
/// Lines are identified by `id`; a cart never holds two lines with the same
/// id. Gift lines carry a `unit_price` of zero and remember the product's
/// normal price in `original_price` so they can be demoted back when
/// eligibility is lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product identifier, unique within a cart.
    pub id: String,

    /// Display name of the product.
    pub name: String,

    /// Price per unit in COP minor units. Zero for gift lines.
    pub unit_price: i64,

    /// Number of units, always at least 1 inside a cart.
    pub quantity: u32,

    /// Whether this line is currently priced as a gift.
    pub is_gift: bool,

    /// The normal unit price, recorded for lines that entered as gifts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<i64>,

    /// Whether the gift was inserted by the eligibility policy rather than
    /// picked by the shopper.
    pub is_auto_gift: bool,

    /// Product image path, when the catalog carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl LineItem {
    /// Creates a normally-priced line with quantity 1.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price: i64,
        image: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            quantity: 1,
            is_gift: false,
            original_price: None,
            is_auto_gift: false,
            image,
        }
    }

    /// Creates a shopper-picked gift line: price zero, original price kept.
    #[must_use]
    pub fn gift(
        id: impl Into<String>,
        name: impl Into<String>,
        original_price: i64,
        image: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price: 0,
            quantity: 1,
            is_gift: true,
            original_price: Some(original_price),
            is_auto_gift: false,
            image,
        }
    }

    /// Creates a gift line inserted by the eligibility policy.
    #[must_use]
    pub fn auto_gift(
        id: impl Into<String>,
        name: impl Into<String>,
        original_price: i64,
        image: Option<String>,
    ) -> Self {
        Self {
            is_auto_gift: true,
            ..Self::gift(id, name, original_price, image)
        }
    }

    /// The line's contribution to the cart subtotal.
    #[must_use]
    pub fn line_total(&self) -> i64 {
        self.unit_price.saturating_mul(i64::from(self.quantity))
    }

    /// Display name with the gift marker the storefront shows.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.is_gift {
            format!("{} (REGALO)", self.name)
        } else {
            self.name.clone()
        }
    }
}
