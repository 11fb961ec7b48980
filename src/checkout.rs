//! Checkout orchestration.
//!
//! The commit path is all-or-nothing: the cart is cleared only once the
//! order record is durably saved. A declined payment or a failed save leaves
//! the cart exactly as it was so the shopper can retry.

use jiff::Timestamp;
use rand::{Rng, rngs::ThreadRng};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    auth::AuthGate,
    cart::Cart,
    gifts::GiftSelector,
    notify::NotificationSink,
    orders::{Order, assemble_order},
    payment::{PaymentRequest, PaymentSimulator, ValidationError},
    persist::{PersistenceError, PersistenceFacade},
    pricing::PricingError,
};

/// Reasons a checkout did not produce an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart had no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// No user was logged in.
    #[error("checkout requires an authenticated user")]
    NotAuthenticated,

    /// The payment request failed shape validation.
    #[error(transparent)]
    InvalidPayment(#[from] ValidationError),

    /// The simulator declined a well-formed request. Retryable.
    #[error("payment was declined")]
    PaymentDeclined,

    /// The cart could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Payment succeeded but no backend recorded the order. The cart is
    /// left intact; payment success and record durability are not atomic.
    #[error("order could not be persisted")]
    Persistence(#[source] PersistenceError),
}

/// Drives a cart through payment into a persisted order.
pub struct CheckoutService<A, P, N, R: Rng = ThreadRng> {
    auth: A,
    persistence: P,
    notifier: N,
    simulator: PaymentSimulator<R>,
}

impl<A, P, N, R: Rng> std::fmt::Debug for CheckoutService<A, P, N, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutService").finish_non_exhaustive()
    }
}

impl<A, P, N, R> CheckoutService<A, P, N, R>
where
    A: AuthGate,
    P: PersistenceFacade,
    N: NotificationSink,
    R: Rng,
{
    /// Wires a checkout service from its collaborators.
    #[must_use]
    pub fn new(auth: A, persistence: P, notifier: N, simulator: PaymentSimulator<R>) -> Self {
        Self {
            auth,
            persistence,
            notifier,
            simulator,
        }
    }

    /// The persistence collaborator.
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// The notification collaborator.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// The authentication collaborator.
    pub fn auth_mut(&mut self) -> &mut A {
        &mut self.auth
    }

    /// Attempts to commit the cart as an order.
    ///
    /// Checks run in order: non-empty cart, authenticated user, payment
    /// shape, simulated authorization, persistence. The cart is cleared only
    /// after the save succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] naming the first check that failed; in
    /// every error case the cart is left untouched.
    #[tracing::instrument(
        name = "checkout",
        skip(self, cart, request),
        fields(method = %request.method())
    )]
    pub async fn checkout<S: GiftSelector>(
        &mut self,
        cart: &mut Cart<S>,
        request: &PaymentRequest,
    ) -> Result<Order, CheckoutError> {
        if cart.is_empty() {
            self.notifier.notify("Tu carrito está vacío");
            return Err(CheckoutError::EmptyCart);
        }

        let Some(user) = self.auth.current_user().cloned() else {
            self.notifier
                .notify("Debes iniciar sesión para proceder al pago");
            return Err(CheckoutError::NotAuthenticated);
        };

        if let Err(error) = request.validate() {
            self.notifier.notify(error.user_message());
            return Err(error.into());
        }

        if !self.simulator.simulate(request) {
            self.notifier
                .notify("Error en el procesamiento del pago. Por favor intenta de nuevo.");
            return Err(CheckoutError::PaymentDeclined);
        }

        let pricing = cart.pricing()?;
        let order = assemble_order(cart.items(), &pricing, request, &user, Timestamp::now());

        match self.persistence.save_order(&order).await {
            Ok(()) => {
                cart.clear();

                info!(
                    transaction_id = %order.transaction_id,
                    total = order.total,
                    "order committed"
                );
                self.notifier
                    .notify("¡Pago procesado exitosamente! Tu orden ha sido registrada.");

                Ok(order)
            }
            Err(error) => {
                warn!(%error, "order persistence failed after an approved payment");
                self.notifier
                    .notify("No pudimos registrar tu orden. Por favor intenta de nuevo.");

                Err(CheckoutError::Persistence(error))
            }
        }
    }
}
