//! Tiered subtotal pricing.
//!
//! Pricing is a pure function of the current line items: subtotal, the
//! discount tier it lands in, the rounded discount amount and the payable
//! total. Gift lines carry a zero unit price, so they never move the
//! subtotal or the tier.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

use crate::items::LineItem;

/// Subtotal at which the top discount tier and gift eligibility start.
pub const GIFT_THRESHOLD: i64 = 500_000;

/// Subtotal at which the mid discount tier starts.
pub const MID_TIER_THRESHOLD: i64 = 300_000;

/// Errors specific to pricing calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// Discount tier for a pre-discount subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountTier {
    /// Below 300,000 COP: no discount.
    None,

    /// 300,000 COP and above: 5%.
    Mid,

    /// 500,000 COP and above: 10%.
    Top,
}

impl DiscountTier {
    /// The tier a pre-discount subtotal falls into. Boundaries are inclusive.
    #[must_use]
    pub fn for_subtotal(subtotal: i64) -> Self {
        if subtotal >= GIFT_THRESHOLD {
            Self::Top
        } else if subtotal >= MID_TIER_THRESHOLD {
            Self::Mid
        } else {
            Self::None
        }
    }

    /// The discount rate applied at this tier.
    #[must_use]
    pub fn rate(self) -> Percentage {
        match self {
            Self::None => Percentage::from(0.0),
            Self::Mid => Percentage::from(0.05),
            Self::Top => Percentage::from(0.10),
        }
    }
}

/// The priced state of a set of line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingResult {
    /// Pre-discount subtotal in COP minor units.
    pub subtotal: i64,

    /// Tier the subtotal landed in.
    pub tier: DiscountTier,

    /// Discount amount in COP minor units, rounded half away from zero.
    pub discount_amount: i64,

    /// Payable total: `subtotal - discount_amount`.
    pub total: i64,

    /// Whether the subtotal qualifies for a free gift.
    pub gift_eligible: bool,
}

/// Prices a set of line items.
///
/// Pure and deterministic: equal items always produce an equal result, and
/// the slice is never mutated.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the discount amount cannot
/// be represented in minor units.
pub fn compute_totals(items: &[LineItem]) -> Result<PricingResult, PricingError> {
    let subtotal = items.iter().map(LineItem::line_total).sum::<i64>();

    let tier = DiscountTier::for_subtotal(subtotal);
    let discount_amount = percent_of_minor(tier.rate(), subtotal)?;

    Ok(PricingResult {
        subtotal,
        tier,
        discount_amount,
        total: subtotal - discount_amount,
        gift_eligible: subtotal >= GIFT_THRESHOLD,
    })
}

/// Calculate a percentage of a minor unit amount, rounded half away from zero.
fn percent_of_minor(percent: Percentage, minor: i64) -> Result<i64, PricingError> {
    let Some(minor) = Decimal::from_i64(minor) else {
        unreachable!("always returns `Some` for every `i64`")
    };

    let applied = percent * minor;
    let rounded = applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    let Some(rounded) = rounded.to_i64() else {
        return Err(PricingError::PercentConversion);
    };

    Ok(rounded)
}
