use crate::domain::chat::ChatRequest;
use crate::domain::errors::{ChatError, PriceHistoryError, ScrapeError};
use crate::domain::listing::{Listing, PriceHistory, RawListing};
use async_trait::async_trait;

/// Shopping-search provider: one query in, a flat table of listings out.
#[async_trait]
pub trait ShoppingSearchService: Send + Sync {
    async fn search(&self, query: &str, api_key: &str) -> Result<Vec<RawListing>, ScrapeError>;

    fn name(&self) -> &str;
}

/// Source of per-listing price history (real API or simulation).
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    async fn fetch_history(&self, listing: &Listing) -> Result<PriceHistory, PriceHistoryError>;

    fn name(&self) -> &str;
}

/// Hosted chat model.
#[async_trait]
pub trait ChatCompletionService: Send + Sync {
    async fn complete(&self, api_key: &str, request: ChatRequest) -> Result<String, ChatError>;
}
