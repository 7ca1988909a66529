use crate::application::history::simulate_history;
use crate::domain::errors::PriceHistoryError;
use crate::domain::listing::{Listing, PriceHistory};
use crate::domain::ports::PriceHistoryProvider;
use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Mutex;

/// Stand-in for the Price API trial service: random-walks a week of prices
/// around each listing's current price.
pub struct SimulatedPriceHistory {
    rng: Mutex<StdRng>,
    days: usize,
}

impl SimulatedPriceHistory {
    pub fn new(days: usize) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
            days,
        }
    }

    /// Deterministic variant for tests and reproducible CLI runs.
    pub fn with_seed(days: usize, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            days,
        }
    }

    pub fn simulate(&self, listing: &Listing) -> PriceHistory {
        // A poisoned lock only means another simulation panicked; the RNG is still usable
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        simulate_history(listing.price, self.days, &mut *rng)
    }
}

#[async_trait]
impl PriceHistoryProvider for SimulatedPriceHistory {
    async fn fetch_history(&self, listing: &Listing) -> Result<PriceHistory, PriceHistoryError> {
        Ok(self.simulate(listing))
    }

    fn name(&self) -> &str {
        "Simulated Price API"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(price: f64) -> Listing {
        Listing {
            title: "Cuban Link".to_string(),
            price,
            seller: "Flipkart".to_string(),
            source: "Flipkart".to_string(),
            rating: None,
            reviews: 0,
            link: String::new(),
            product_id: String::new(),
            history: None,
        }
    }

    #[test]
    fn test_seeded_provider_is_deterministic() {
        let a = SimulatedPriceHistory::with_seed(7, 11);
        let b = SimulatedPriceHistory::with_seed(7, 11);
        let l = listing(799.0);
        let ha = tokio_test::block_on(a.fetch_history(&l)).unwrap();
        let hb = tokio_test::block_on(b.fetch_history(&l)).unwrap();
        assert_eq!(ha, hb);
    }
}
