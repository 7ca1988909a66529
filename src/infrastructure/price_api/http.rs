use crate::application::history::summarize_history;
use crate::config::HistoryEnvConfig;
use crate::domain::errors::PriceHistoryError;
use crate::domain::listing::{Listing, PriceHistory};
use crate::domain::ports::PriceHistoryProvider;
use crate::infrastructure::core::{HttpClientFactory, build_url_with_query};
use anyhow::Context;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct PriceHistoryResponse {
    /// Daily prices, oldest first
    #[serde(default)]
    prices: Vec<f64>,
}

/// Client for a hosted price-tracking API.
///
/// `GET {url}?product_id=..&title=..&api_key=..&days=N` answering
/// `{"prices": [..]}`.
pub struct HttpPriceHistory {
    client: ClientWithMiddleware,
    url: String,
    api_key: String,
    days: usize,
}

impl HttpPriceHistory {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, days: usize) -> Self {
        Self {
            // Per-listing lookups: keep the timeout short so a dead API falls back quickly
            client: HttpClientFactory::create_client_with_timeout(Duration::from_secs(8)),
            url: url.into(),
            api_key: api_key.into(),
            days,
        }
    }

    /// `None` when the config lacks a key or endpoint.
    pub fn from_config(config: &HistoryEnvConfig) -> Option<Self> {
        if !config.use_live_api() {
            return None;
        }
        let url = config.api_url.clone()?;
        Some(Self::new(url, config.api_key.clone(), config.days))
    }
}

#[async_trait]
impl PriceHistoryProvider for HttpPriceHistory {
    async fn fetch_history(&self, listing: &Listing) -> Result<PriceHistory, PriceHistoryError> {
        let days = self.days.to_string();
        let url = build_url_with_query(
            &self.url,
            &[
                ("product_id", listing.tracking_key()),
                ("title", listing.title.as_str()),
                ("api_key", self.api_key.as_str()),
                ("days", days.as_str()),
            ],
        )?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request to Price API")?;

        if !response.status().is_success() {
            return Err(PriceHistoryError::Rejected {
                status: response.status().as_u16(),
            });
        }

        let body: PriceHistoryResponse = response
            .json()
            .await
            .context("Failed to parse Price API response")?;

        summarize_history(listing.price, &body.prices).ok_or_else(|| PriceHistoryError::NoHistory {
            key: listing.tracking_key().to_string(),
        })
    }

    fn name(&self) -> &str {
        "Price API"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_key_and_url() {
        let mut config = HistoryEnvConfig::default();
        assert!(HttpPriceHistory::from_config(&config).is_none());

        config.api_key = "k".to_string();
        assert!(HttpPriceHistory::from_config(&config).is_none());

        config.api_url = Some("https://prices.example/v1/history".to_string());
        assert!(HttpPriceHistory::from_config(&config).is_some());
    }

    #[test]
    fn test_response_tolerates_missing_prices() {
        let body: PriceHistoryResponse = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(body.prices.is_empty());
    }
}
