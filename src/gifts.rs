//! Gift selection strategies.
//!
//! The eligibility policy lives in the cart; this module only decides *which*
//! candidate becomes the gift once the cart has decided one should exist.

use rand::{Rng, rngs::ThreadRng, seq::SliceRandom};

use crate::catalog::Product;

/// Picks at most one gift from the candidate pool.
pub trait GiftSelector {
    /// Selects a candidate, or `None` when the pool is empty.
    fn select<'a>(&mut self, candidates: &'a [Product]) -> Option<&'a Product>;
}

/// Uniform random selection, the storefront default.
#[derive(Debug, Clone)]
pub struct RandomGiftSelector<R: Rng = ThreadRng> {
    rng: R,
}

impl<R: Rng> RandomGiftSelector<R> {
    /// Creates a selector over the given random source.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for RandomGiftSelector {
    fn default() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Rng> GiftSelector for RandomGiftSelector<R> {
    fn select<'a>(&mut self, candidates: &'a [Product]) -> Option<&'a Product> {
        candidates.choose(&mut self.rng)
    }
}

/// Always picks the first candidate. Deterministic, for tests and previews.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidateSelector;

impl GiftSelector for FirstCandidateSelector {
    fn select<'a>(&mut self, candidates: &'a [Product]) -> Option<&'a Product> {
        candidates.first()
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn candidates() -> [Product; 3] {
        [
            Product::new("regalo-1", "Gorra Adidas", 80_000),
            Product::new("regalo-2", "Botella Deportiva", 45_000),
            Product::new("regalo-3", "Toalla Nike", 60_000),
        ]
    }

    #[test]
    fn random_selector_picks_from_the_pool() {
        let pool = candidates();
        let mut selector = RandomGiftSelector::new(StdRng::seed_from_u64(7));

        let picked = selector.select(&pool);

        assert!(
            picked.is_some_and(|p| pool.contains(p)),
            "selection should come from the pool"
        );
    }

    #[test]
    fn empty_pool_selects_nothing() {
        let mut selector = RandomGiftSelector::new(StdRng::seed_from_u64(7));

        assert!(selector.select(&[]).is_none());
    }

    #[test]
    fn first_candidate_selector_is_deterministic() {
        let pool = candidates();
        let mut selector = FirstCandidateSelector;

        assert_eq!(
            selector.select(&pool).map(|p| p.id.as_str()),
            Some("regalo-1")
        );
    }
}
