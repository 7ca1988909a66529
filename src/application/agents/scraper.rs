use crate::domain::errors::ScrapeError;
use crate::domain::listing::RawListing;
use crate::domain::ports::ShoppingSearchService;
use std::sync::Arc;
use tracing::{info, warn};

/// Agent 1: one outbound search per run.
pub struct ScraperAgent {
    search: Arc<dyn ShoppingSearchService>,
}

impl ScraperAgent {
    pub fn new(search: Arc<dyn ShoppingSearchService>) -> Self {
        Self { search }
    }

    pub async fn run(&self, query: &str, api_key: &str) -> Result<Vec<RawListing>, ScrapeError> {
        if api_key.trim().is_empty() {
            return Err(ScrapeError::MissingApiKey);
        }

        info!(
            "[Agent 1: Scraper] Searching '{}' via {}",
            query,
            self.search.name()
        );
        let listings = self.search.search(query, api_key).await?;

        if listings.is_empty() {
            warn!("[Agent 1: Scraper] No results found for '{}'", query);
            return Err(ScrapeError::NoResults {
                query: query.to_string(),
            });
        }

        info!("[Agent 1: Scraper] Found {} listings", listings.len());
        if let Some((low, high)) = quick_price_range(&listings) {
            info!("[Agent 1: Scraper] Price range: {:.2} - {:.2}", low, high);
        }

        Ok(listings)
    }
}

/// Min/max over prices that already parse as plain positive numbers.
fn quick_price_range(listings: &[RawListing]) -> Option<(f64, f64)> {
    listings
        .iter()
        .filter_map(|l| l.price.as_deref()?.trim().parse::<f64>().ok())
        .filter(|p| p.is_finite() && *p > 0.0)
        .fold(None, |acc, p| match acc {
            None => Some((p, p)),
            Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
        })
}
