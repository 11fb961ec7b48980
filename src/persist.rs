//! Order persistence.
//!
//! Storage backends stay external behind an async facade. The storefront's
//! "try the server, fall back to local" behavior is a [`RankedPersistence`]
//! over an ordered backend list; [`InMemoryOrderStore`] keeps records as
//! JSON values, the boundary format of every real backend.

use std::sync::Mutex;

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::orders::Order;

/// Errors raised while persisting an order.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The backend refused the record.
    #[error("backend rejected the order: {0}")]
    Rejected(String),

    /// The order could not be serialized to the boundary format.
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),

    /// Every backend in a ranked chain failed.
    #[error("no persistence backend accepted the order")]
    Exhausted,
}

/// Durable storage for committed orders.
///
/// Backends own their retries and concurrency control; callers see a single
/// attempt per order.
#[automock]
#[async_trait]
pub trait PersistenceFacade: Send + Sync {
    /// Persists one order record.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] when the record was not durably
    /// stored.
    async fn save_order(&self, order: &Order) -> Result<(), PersistenceError>;
}

/// Tries an ordered list of backends until one accepts the order.
pub struct RankedPersistence {
    backends: Vec<Box<dyn PersistenceFacade>>,
}

impl std::fmt::Debug for RankedPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankedPersistence")
            .field("backends", &self.backends.len())
            .finish()
    }
}

impl RankedPersistence {
    /// Creates a chain over backends in preference order.
    #[must_use]
    pub fn new(backends: Vec<Box<dyn PersistenceFacade>>) -> Self {
        Self { backends }
    }

    /// Appends a backend at the lowest preference.
    pub fn push(&mut self, backend: Box<dyn PersistenceFacade>) {
        self.backends.push(backend);
    }
}

#[async_trait]
impl PersistenceFacade for RankedPersistence {
    async fn save_order(&self, order: &Order) -> Result<(), PersistenceError> {
        for (rank, backend) in self.backends.iter().enumerate() {
            match backend.save_order(order).await {
                Ok(()) => {
                    if rank > 0 {
                        warn!(rank, "order persisted by a fallback backend");
                    }

                    return Ok(());
                }
                Err(error) => {
                    warn!(rank, %error, "persistence backend failed, trying next");
                }
            }
        }

        Err(PersistenceError::Exhausted)
    }
}

/// Keeps order records in memory as JSON values.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: Mutex<Vec<Value>>,
}

impl InMemoryOrderStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored record, in arrival order.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        match self.orders.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl PersistenceFacade for InMemoryOrderStore {
    async fn save_order(&self, order: &Order) -> Result<(), PersistenceError> {
        let value = serde_json::to_value(order)?;

        let mut guard = match self.orders.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        guard.push(value);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use super::*;
    use crate::{
        auth::User,
        items::LineItem,
        orders::assemble_order,
        payment::PaymentRequest,
        pricing::compute_totals,
    };

    fn sample_order() -> Result<Order, crate::pricing::PricingError> {
        let items = [LineItem::new("tenis-1", "Tenis Nike Air", 600_000, None)];
        let pricing = compute_totals(&items)?;

        let user = User {
            id: "google-123".to_string(),
            name: "Ana María".to_string(),
            email: "ana@gmail.com".to_string(),
            photo: None,
            provider: None,
        };

        let request = PaymentRequest::Nequi {
            number: "3001234567".to_string(),
        };

        Ok(assemble_order(
            &items,
            &pricing,
            &request,
            &user,
            Timestamp::now(),
        ))
    }

    #[tokio::test]
    async fn in_memory_store_keeps_records_in_order() -> TestResult {
        let store = InMemoryOrderStore::new();

        store.save_order(&sample_order()?).await?;
        store.save_order(&sample_order()?).await?;

        assert_eq!(store.orders().len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn ranked_chain_prefers_the_first_backend() -> TestResult {
        let mut primary = MockPersistenceFacade::new();
        primary.expect_save_order().times(1).returning(|_| Ok(()));

        let mut secondary = MockPersistenceFacade::new();
        secondary.expect_save_order().times(0);

        let chain = RankedPersistence::new(vec![Box::new(primary), Box::new(secondary)]);

        chain.save_order(&sample_order()?).await?;

        Ok(())
    }

    #[tokio::test]
    async fn ranked_chain_falls_back_on_failure() -> TestResult {
        let mut primary = MockPersistenceFacade::new();
        primary
            .expect_save_order()
            .times(1)
            .returning(|_| Err(PersistenceError::Rejected("server unavailable".to_string())));

        let fallback = InMemoryOrderStore::new();

        let mut chain = RankedPersistence::new(vec![Box::new(primary)]);
        chain.push(Box::new(fallback));

        chain.save_order(&sample_order()?).await?;

        Ok(())
    }

    #[tokio::test]
    async fn exhausted_chain_surfaces_an_error() -> TestResult {
        let mut only = MockPersistenceFacade::new();
        only.expect_save_order()
            .times(1)
            .returning(|_| Err(PersistenceError::Rejected("disk full".to_string())));

        let chain = RankedPersistence::new(vec![Box::new(only)]);

        let result = chain.save_order(&sample_order()?).await;

        assert!(
            matches!(result, Err(PersistenceError::Exhausted)),
            "expected Exhausted, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn empty_chain_is_always_exhausted() -> TestResult {
        let chain = RankedPersistence::new(Vec::new());

        let result = chain.save_order(&sample_order()?).await;

        assert!(matches!(result, Err(PersistenceError::Exhausted)));

        Ok(())
    }
}
