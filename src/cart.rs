//! The cart aggregate.
//!
//! A `Cart` owns its line items exclusively; every mutation goes through one
//! of the methods here, re-runs the gift eligibility policy and reprices the
//! whole cart. Mutations return a [`CartUpdate`] carrying the new pricing
//! plus any gift events, so the caller decides what to surface to the
//! shopper.

use smallvec::SmallVec;

use crate::{
    catalog::Product,
    gifts::{GiftSelector, RandomGiftSelector},
    items::LineItem,
    pricing::{GIFT_THRESHOLD, PricingError, PricingResult, compute_totals},
};

/// A gift-related side effect of a cart mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A gift line was inserted.
    GiftAdded {
        /// Product id of the gift.
        id: String,
        /// Product name of the gift.
        name: String,
        /// Whether the policy picked it rather than the shopper.
        auto: bool,
    },

    /// The gift line was removed because the subtotal dropped below the
    /// eligibility threshold.
    GiftRemoved {
        /// Product id of the removed gift.
        id: String,
        /// Product name of the removed gift.
        name: String,
    },

    /// A gift-section add was redirected to a normally-priced line because a
    /// gift already exists.
    GiftRedirected {
        /// Product id that was added at normal price.
        id: String,
        /// Product name that was added at normal price.
        name: String,
    },
}

impl CartEvent {
    /// Storefront copy for this event.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::GiftAdded { name, auto: true, .. } => {
                format!("¡Felicidades! Has ganado un regalo: {name}")
            }
            Self::GiftAdded { name, auto: false, .. } => {
                format!("¡{name} agregado como regalo GRATIS!")
            }
            Self::GiftRemoved { name, .. } => {
                format!("El regalo {name} fue retirado: tu compra ya no supera los $500.000")
            }
            Self::GiftRedirected { name, .. } => {
                format!("Ya tienes un regalo en tu carrito. {name} fue agregado a precio normal")
            }
        }
    }
}

/// The outcome of a cart mutation: fresh pricing plus gift events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartUpdate {
    /// Pricing of the cart after the mutation.
    pub pricing: PricingResult,

    /// Gift events raised by the mutation, in order.
    pub events: SmallVec<[CartEvent; 2]>,
}

/// A shopping cart with tiered pricing and a single-gift policy.
///
/// Holds the gift candidate pool it was created with; candidates whose id is
/// already in the cart are skipped during auto-selection.
#[derive(Debug, Clone)]
pub struct Cart<S: GiftSelector = RandomGiftSelector> {
    items: Vec<LineItem>,
    candidates: Vec<Product>,
    selector: S,
}

impl Cart {
    /// Creates an empty cart with the default random gift selector.
    #[must_use]
    pub fn new(candidates: Vec<Product>) -> Self {
        Self::with_selector(candidates, RandomGiftSelector::default())
    }
}

impl<S: GiftSelector> Cart<S> {
    /// Creates an empty cart with an explicit gift selector.
    #[must_use]
    pub fn with_selector(candidates: Vec<Product>, selector: S) -> Self {
        Self {
            items: Vec::new(),
            candidates,
            selector,
        }
    }

    /// Line items in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The current gift line, if one exists.
    #[must_use]
    pub fn gift(&self) -> Option<&LineItem> {
        self.items.iter().find(|item| item.is_gift)
    }

    /// Prices the cart without mutating it.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] if the discount cannot be computed.
    pub fn pricing(&self) -> Result<PricingResult, PricingError> {
        compute_totals(&self.items)
    }

    /// Adds one unit of a product: merges into an existing line by id or
    /// appends a new line with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] if the resulting cart cannot be priced.
    pub fn add(&mut self, product: &Product) -> Result<CartUpdate, PricingError> {
        self.bump_or_insert(product);

        self.finish(SmallVec::new(), true)
    }

    /// Adds a product from the gift section.
    ///
    /// Eligibility is computed at call time: eligible with no existing gift
    /// inserts a zero-priced gift line; a second gift is redirected to a
    /// normal add; an ineligible cart falls back to a normal add silently.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] if the resulting cart cannot be priced.
    pub fn add_gift(&mut self, product: &Product) -> Result<CartUpdate, PricingError> {
        let mut events = SmallVec::new();

        if self.gift().is_some() {
            events.push(CartEvent::GiftRedirected {
                id: product.id.clone(),
                name: product.name.clone(),
            });

            self.bump_or_insert(product);
        } else if self.subtotal() >= GIFT_THRESHOLD {
            if let Some(item) = self.items.iter_mut().find(|item| item.id == product.id) {
                item.quantity += 1;
            } else {
                events.push(CartEvent::GiftAdded {
                    id: product.id.clone(),
                    name: product.name.clone(),
                    auto: false,
                });

                self.items.push(LineItem::gift(
                    product.id.clone(),
                    product.name.clone(),
                    product.price,
                    product.image.clone(),
                ));
            }
        } else {
            self.bump_or_insert(product);
        }

        self.finish(events, true)
    }

    /// Removes a line by id. Unknown ids are a silent no-op.
    ///
    /// Removing the gift line does not auto-admit a replacement in the same
    /// mutation; the next mutation or [`Cart::refresh_gifts`] may.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] if the resulting cart cannot be priced.
    pub fn remove(&mut self, id: &str) -> Result<CartUpdate, PricingError> {
        let removed_gift = self.items.iter().any(|item| item.id == id && item.is_gift);

        self.items.retain(|item| item.id != id);

        self.finish(SmallVec::new(), !removed_gift)
    }

    /// Changes a line's quantity by a signed delta.
    ///
    /// A resulting quantity of zero or less removes the line. Gift lines
    /// recompute their own eligibility against the rest of the cart. Unknown
    /// ids are a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] if the resulting cart cannot be priced.
    pub fn update_quantity(&mut self, id: &str, delta: i32) -> Result<CartUpdate, PricingError> {
        let Some(current) = self
            .items
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.quantity)
        else {
            return Ok(CartUpdate {
                pricing: compute_totals(&self.items)?,
                events: SmallVec::new(),
            });
        };

        let next = i64::from(current) + i64::from(delta);

        if next <= 0 {
            return self.remove(id);
        }

        let mut was_gift_line = false;

        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = u32::try_from(next).unwrap_or(u32::MAX);
            was_gift_line = item.original_price.is_some();
        }

        if was_gift_line {
            self.reprice_gift_line(id);
        }

        self.finish(SmallVec::new(), true)
    }

    /// Re-runs the gift eligibility policy without touching other lines.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] if the resulting cart cannot be priced.
    pub fn refresh_gifts(&mut self) -> Result<CartUpdate, PricingError> {
        self.finish(SmallVec::new(), true)
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn bump_or_insert(&mut self, product: &Product) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == product.id) {
            item.quantity += 1;
        } else {
            self.items.push(LineItem::new(
                product.id.clone(),
                product.name.clone(),
                product.price,
                product.image.clone(),
            ));
        }
    }

    fn subtotal(&self) -> i64 {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// A gift line whose own quantity changed is promoted or demoted against
    /// the subtotal of everything else.
    fn reprice_gift_line(&mut self, id: &str) {
        let rest: i64 = self
            .items
            .iter()
            .filter(|item| item.id != id)
            .map(LineItem::line_total)
            .sum();

        let eligible = rest >= GIFT_THRESHOLD;

        if let Some(item) = self.items.iter_mut().find(|item| item.id == id)
            && let Some(original) = item.original_price
        {
            if eligible {
                item.unit_price = 0;
                item.is_gift = true;
            } else {
                item.unit_price = original;
                item.is_gift = false;
            }
        }
    }

    fn finish(
        &mut self,
        mut events: SmallVec<[CartEvent; 2]>,
        auto_add: bool,
    ) -> Result<CartUpdate, PricingError> {
        self.reevaluate_gifts(&mut events, auto_add);

        Ok(CartUpdate {
            pricing: compute_totals(&self.items)?,
            events,
        })
    }

    /// Enforces the single-gift policy: removes gifts once the subtotal
    /// drops below the threshold, and (when `auto_add` holds) admits exactly
    /// one gift once it is reached.
    fn reevaluate_gifts(&mut self, events: &mut SmallVec<[CartEvent; 2]>, auto_add: bool) {
        if self.subtotal() >= GIFT_THRESHOLD {
            if !auto_add || self.gift().is_some() {
                return;
            }

            let available: Vec<Product> = self
                .candidates
                .iter()
                .filter(|candidate| self.items.iter().all(|item| item.id != candidate.id))
                .cloned()
                .collect();

            if let Some(picked) = self.selector.select(&available) {
                events.push(CartEvent::GiftAdded {
                    id: picked.id.clone(),
                    name: picked.name.clone(),
                    auto: true,
                });

                self.items.push(LineItem::auto_gift(
                    picked.id.clone(),
                    picked.name.clone(),
                    picked.price,
                    picked.image.clone(),
                ));
            }
        } else {
            for item in self.items.iter().filter(|item| item.is_gift) {
                events.push(CartEvent::GiftRemoved {
                    id: item.id.clone(),
                    name: item.name.clone(),
                });
            }

            self.items.retain(|item| !item.is_gift);
        }
    }
}
