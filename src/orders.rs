//! Order records.
//!
//! An order is an immutable snapshot taken only after a successful payment
//! authorization: items by value, the pricing that applied, and sanitized
//! payment details. The CVV never reaches a record.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::User,
    items::LineItem,
    payment::{PaymentMethod, PaymentRequest},
    pricing::PricingResult,
};

/// Lifecycle status of an order record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Payment authorized and the order recorded.
    Completed,
}

/// Payment details safe to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedPayment {
    /// Masked number: `****` plus the last four digits.
    pub number: String,

    /// Card expiry, kept as entered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,

    /// Name on the card.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,
}

impl SanitizedPayment {
    /// Reduces a request to its persistable details.
    #[must_use]
    pub fn from_request(request: &PaymentRequest) -> Self {
        match request {
            PaymentRequest::Nequi { number } | PaymentRequest::Bancolombia { number } => Self {
                number: mask_number(number),
                expiry: None,
                holder: None,
            },
            // The CVV is dropped here and nowhere else carries it.
            PaymentRequest::Card {
                number,
                expiry,
                holder,
                ..
            } => Self {
                number: mask_number(number),
                expiry: Some(expiry.clone()),
                holder: Some(holder.clone()),
            },
        }
    }
}

/// An immutable record of a committed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Line items at the moment of purchase.
    pub items: Vec<LineItem>,

    /// Pre-discount subtotal in COP minor units.
    pub subtotal: i64,

    /// Discount applied in COP minor units.
    pub discount: i64,

    /// Amount charged in COP minor units.
    pub total: i64,

    /// Method the shopper paid with.
    pub payment_method: PaymentMethod,

    /// Sanitized payment details.
    pub payment_details: SanitizedPayment,

    /// Transaction id: `<method>_<uuid-v7>`.
    pub transaction_id: String,

    /// Id of the purchasing user.
    pub user_id: String,

    /// Email of the purchasing user.
    pub user_email: String,

    /// Record status.
    pub status: OrderStatus,

    /// When the order was placed.
    pub order_date: Timestamp,
}

/// Snapshots a successful purchase into an [`Order`].
///
/// Must only be called after the payment simulator approved the request;
/// callers own that invariant.
#[must_use]
pub fn assemble_order(
    items: &[LineItem],
    pricing: &PricingResult,
    request: &PaymentRequest,
    user: &User,
    placed_at: Timestamp,
) -> Order {
    let method = request.method();

    Order {
        items: items.to_vec(),
        subtotal: pricing.subtotal,
        discount: pricing.discount_amount,
        total: pricing.total,
        payment_method: method,
        payment_details: SanitizedPayment::from_request(request),
        transaction_id: transaction_id(method),
        user_id: user.id.clone(),
        user_email: user.email.clone(),
        status: OrderStatus::Completed,
        order_date: placed_at,
    }
}

/// A fresh transaction id for a payment method.
///
/// UUID v7 rather than a clock reading, so rapid successive checkouts can
/// never collide.
#[must_use]
pub fn transaction_id(method: PaymentMethod) -> String {
    format!("{}_{}", method.key(), Uuid::now_v7())
}

/// Masks a payment number down to `****` plus its last four digits.
fn mask_number(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(char::is_ascii_digit).collect();

    let tail: String = digits
        .iter()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    format!("****{tail}")
}
