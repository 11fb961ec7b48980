//! Vitrina prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    auth::{AuthGate, Session, User},
    cart::{Cart, CartEvent, CartUpdate},
    catalog::{Catalog, CatalogError, CatalogProvider, Category, Product},
    checkout::{CheckoutError, CheckoutService},
    customization::{HelmetCustomization, HelmetDesign},
    gifts::{FirstCandidateSelector, GiftSelector, RandomGiftSelector},
    items::LineItem,
    money::format_cop,
    notify::{MemorySink, NotificationSink, TracingSink},
    orders::{Order, OrderStatus, SanitizedPayment, assemble_order},
    payment::{PaymentMethod, PaymentRequest, PaymentSimulator, ValidationError},
    persist::{InMemoryOrderStore, PersistenceError, PersistenceFacade, RankedPersistence},
    pricing::{
        DiscountTier, GIFT_THRESHOLD, MID_TIER_THRESHOLD, PricingError, PricingResult,
        compute_totals,
    },
    reservation::{ReservationError, ReservationRequest, reservation_message, summary_lines},
};
