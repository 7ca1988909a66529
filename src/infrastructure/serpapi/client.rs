use crate::config::SearchEnvConfig;
use crate::domain::errors::ScrapeError;
use crate::domain::listing::RawListing;
use crate::domain::ports::ShoppingSearchService;
use crate::infrastructure::core::{HttpClientFactory, build_url_with_query, redact_api_key};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;
use tracing::{debug, info, warn};

pub struct SerpApiClient {
    client: ClientWithMiddleware,
    base_url: String,
    country: String,
    language: String,
    num_results: usize,
}

impl SerpApiClient {
    pub fn new(config: &SearchEnvConfig) -> Self {
        Self {
            client: HttpClientFactory::create_client(),
            base_url: config.base_url.clone(),
            country: config.country.clone(),
            language: config.language.clone(),
            num_results: config.num_results,
        }
    }
}

#[async_trait]
impl ShoppingSearchService for SerpApiClient {
    async fn search(&self, query: &str, api_key: &str) -> Result<Vec<RawListing>, ScrapeError> {
        if api_key.is_empty() {
            return Err(ScrapeError::MissingApiKey);
        }

        let num = self.num_results.to_string();
        let url = build_url_with_query(
            &self.base_url,
            &[
                ("engine", "google_shopping"),
                ("q", query),
                ("api_key", api_key),
                ("num", num.as_str()),
                ("gl", self.country.as_str()),
                ("hl", self.language.as_str()),
            ],
        )?;
        debug!("SerpApi request: {}", redact_api_key(&url));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request to SerpApi")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read SerpApi response")?;
        // Error pages are not always JSON; the status alone decides those
        let body: Value = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(_) if !status.is_success() => Value::Null,
            Err(e) => {
                let err = anyhow::Error::new(e).context("Failed to parse SerpApi response");
                return Err(err.into());
            }
        };
        check_response(status, &body)?;

        let listings = parse_shopping_results(&body);
        if listings.is_empty() {
            let keys: Vec<&str> = body
                .as_object()
                .map(|o| o.keys().map(String::as_str).collect())
                .unwrap_or_default();
            warn!("SerpApi returned no shopping results. Response keys: {:?}", keys);
        } else {
            info!("SerpApi returned {} shopping results", listings.len());
        }
        Ok(listings)
    }

    fn name(&self) -> &str {
        "SerpApi Google Shopping"
    }
}

/// SerpApi reports bad keys and exhausted plans as `{"error": "..."}`, often
/// with a 4xx. Either signal is a provider failure.
pub fn check_response(status: StatusCode, body: &Value) -> Result<(), ScrapeError> {
    if let Some(message) = body.get("error").and_then(Value::as_str) {
        return Err(ScrapeError::Provider {
            message: message.to_string(),
        });
    }
    if !status.is_success() {
        return Err(ScrapeError::Provider {
            message: format!("HTTP {}", status),
        });
    }
    Ok(())
}

/// Flattens `shopping_results` into raw rows. Missing fields get the same
/// placeholders the dashboard shows ("N/A", "Unknown", empty link).
pub fn parse_shopping_results(body: &Value) -> Vec<RawListing> {
    let Some(items) = body.get("shopping_results").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| {
            let text = |key: &str| item.get(key).and_then(value_to_text);
            let source = text("source").unwrap_or_else(|| "Unknown".to_string());

            // extracted_price is already numeric; the display price needs cleaning downstream
            let price = text("extracted_price").or_else(|| text("price"));

            RawListing {
                title: text("title").unwrap_or_else(|| "N/A".to_string()),
                price,
                seller: source.clone(),
                source,
                link: text("link")
                    .or_else(|| text("product_link"))
                    .unwrap_or_default(),
                rating: text("rating"),
                reviews: text("reviews"),
                product_id: text("product_id").unwrap_or_default(),
                thumbnail: text("thumbnail").unwrap_or_default(),
                delivery: text("delivery").unwrap_or_else(|| "N/A".to_string()),
            }
        })
        .collect()
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_prefers_extracted_price() {
        let body = json!({
            "shopping_results": [{
                "title": "Gold Plated Rope Chain",
                "price": "₹1,299.00",
                "extracted_price": 1299.0,
                "source": "Amazon.in",
                "link": "https://amazon.in/x",
                "rating": 4.3,
                "reviews": 1520,
                "product_id": "123",
                "delivery": "Free delivery"
            }]
        });

        let rows = parse_shopping_results(&body);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.price.as_deref(), Some("1299.0"));
        assert_eq!(row.seller, "Amazon.in");
        assert_eq!(row.source, "Amazon.in");
        assert_eq!(row.rating.as_deref(), Some("4.3"));
        assert_eq!(row.reviews.as_deref(), Some("1520"));
        assert_eq!(row.product_id, "123");
    }

    #[test]
    fn test_parse_falls_back_to_display_price_and_placeholders() {
        let body = json!({
            "shopping_results": [{ "price": "Rs. 2,450" }]
        });

        let rows = parse_shopping_results(&body);
        let row = &rows[0];
        assert_eq!(row.price.as_deref(), Some("Rs. 2,450"));
        assert_eq!(row.title, "N/A");
        assert_eq!(row.seller, "Unknown");
        assert_eq!(row.delivery, "N/A");
        assert!(row.link.is_empty());
        assert!(row.rating.is_none());
    }

    #[test]
    fn test_parse_without_results_is_empty() {
        assert!(parse_shopping_results(&json!({"search_metadata": {}})).is_empty());
        assert!(parse_shopping_results(&json!({"shopping_results": "oops"})).is_empty());
    }

    #[test]
    fn test_error_field_with_unauthorized_status() {
        let body = json!({"error": "Invalid API key. Your API key should be here: https://serpapi.com/manage-api-key"});
        let err = check_response(StatusCode::UNAUTHORIZED, &body).unwrap_err();
        match err {
            ScrapeError::Provider { message } => assert!(message.starts_with("Invalid API key")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_field_with_ok_status() {
        let body = json!({"error": "Google Shopping hasn't returned any results for this query."});
        assert!(matches!(
            check_response(StatusCode::OK, &body),
            Err(ScrapeError::Provider { message }) if message.contains("any results")
        ));
    }

    #[test]
    fn test_server_error_without_error_field() {
        let err = check_response(StatusCode::INTERNAL_SERVER_ERROR, &json!({})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Search provider error: HTTP 500 Internal Server Error"
        );
        assert!(check_response(StatusCode::BAD_GATEWAY, &Value::Null).is_err());
    }

    #[test]
    fn test_ok_response_passes() {
        assert!(check_response(StatusCode::OK, &json!({"shopping_results": []})).is_ok());
    }

    #[test]
    fn test_null_rating_is_missing() {
        let body = json!({ "shopping_results": [{ "title": "Chain", "rating": null }] });
        assert!(parse_shopping_results(&body)[0].rating.is_none());
    }
}
