//! Vitrina
//!
//! Vitrina is the cart pricing, gift-eligibility and order-commit engine behind the "Estilo Activo" activewear storefront.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod customization;
pub mod gifts;
pub mod items;
pub mod money;
pub mod notify;
pub mod orders;
pub mod payment;
pub mod persist;
pub mod prelude;
pub mod pricing;
pub mod reservation;
