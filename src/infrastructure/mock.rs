//! Offline adapters for `MODE=mock` and for tests.

use crate::domain::chat::{ChatRequest, ChatRole};
use crate::domain::errors::{ChatError, ScrapeError};
use crate::domain::listing::RawListing;
use crate::domain::ports::{ChatCompletionService, ShoppingSearchService};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use tracing::info;

const MOCK_SELLERS: [(&str, f64); 8] = [
    ("Amazon.in", 1.00),
    ("Flipkart", 0.95),
    ("Myntra", 1.10),
    ("Meesho", 0.60),
    ("Tata CLiQ", 1.25),
    ("Nykaa Fashion", 1.15),
    ("Ajio", 1.05),
    ("Snapdeal", 0.70),
];

/// Search provider that fabricates a realistic, slightly messy result page.
///
/// The same query always yields the same rows.
pub struct MockShoppingSearch {
    fixed: Option<Vec<RawListing>>,
    num_results: usize,
}

impl MockShoppingSearch {
    pub fn new(num_results: usize) -> Self {
        Self {
            fixed: None,
            num_results,
        }
    }

    /// Always answers with `listings`, whatever the query.
    pub fn with_listings(listings: Vec<RawListing>) -> Self {
        let num_results = listings.len();
        Self {
            fixed: Some(listings),
            num_results,
        }
    }

    fn generate(&self, query: &str) -> Vec<RawListing> {
        let seed = query
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325_u64, |h, b| (h ^ b as u64).wrapping_mul(0x0100_0000_01b3));
        let mut rng = StdRng::seed_from_u64(seed);
        let base_price: f64 = rng.random_range(800.0..5000.0);

        (0..self.num_results)
            .map(|i| {
                let (seller, markup) = MOCK_SELLERS[rng.random_range(0..MOCK_SELLERS.len())];
                let rating: f64 = rng.random_range(3.0..5.0);
                let reviews: u64 = rng.random_range(0..4000);
                let noise: f64 = rng.random_range(0.8..1.2);
                let price = (base_price * markup * (0.9 + rating / 20.0) * noise).round();

                // A few rows mimic what the provider actually sends back
                let price_text = match i % 9 {
                    3 => Some(format!("₹{}", format_thousands(price))),
                    5 => Some(format!("Rs. {:.0}", price)),
                    8 if i % 18 == 8 => None,
                    _ => Some(format!("{:.1}", price)),
                };
                let rating_text = if i % 7 == 6 {
                    None
                } else {
                    Some(format!("{:.1}", rating))
                };
                let reviews_text = if reviews >= 1000 {
                    format_thousands(reviews as f64)
                } else {
                    reviews.to_string()
                };

                RawListing {
                    title: format!("{} - Style {}", title_case(query), i + 1),
                    price: price_text,
                    source: seller.to_string(),
                    seller: seller.to_string(),
                    link: format!(
                        "https://shop.example/{}/{}",
                        seller.to_lowercase().replace([' ', '.'], "-"),
                        i + 1
                    ),
                    rating: rating_text,
                    reviews: Some(reviews_text),
                    product_id: format!("mock-{:04}", i + 1),
                    thumbnail: String::new(),
                    delivery: if i % 3 == 0 {
                        "Free delivery".to_string()
                    } else {
                        "N/A".to_string()
                    },
                }
            })
            .collect()
    }
}

#[async_trait]
impl ShoppingSearchService for MockShoppingSearch {
    async fn search(&self, query: &str, api_key: &str) -> Result<Vec<RawListing>, ScrapeError> {
        if api_key.is_empty() {
            return Err(ScrapeError::MissingApiKey);
        }
        let rows = match &self.fixed {
            Some(rows) => rows.clone(),
            None => self.generate(query),
        };
        info!("MockShoppingSearch: {} listings for '{}'", rows.len(), query);
        Ok(rows)
    }

    fn name(&self) -> &str {
        "Mock Shopping Search"
    }
}

fn format_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Chat provider that records every request and answers from a script.
pub struct MockChatService {
    reply: Result<String, String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatService {
    /// Echoes the first line of the market context back, so mock mode shows
    /// that the assistant actually saw the data.
    pub fn new() -> Self {
        Self {
            reply: Ok(String::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Default for MockChatService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatCompletionService for MockChatService {
    async fn complete(&self, _api_key: &str, request: ChatRequest) -> Result<String, ChatError> {
        let question = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let summary = request
            .messages
            .first()
            .and_then(|m| {
                m.content
                    .lines()
                    .map(str::trim)
                    .find(|l| l.starts_with("- Market Average Price"))
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "No market data available yet.".to_string());

        if let Ok(mut log) = self.requests.lock() {
            log.push(request);
        }

        match &self.reply {
            Ok(reply) if reply.is_empty() => Ok(format!(
                "(mock assistant) You asked: \"{}\". {}",
                question, summary
            )),
            Ok(reply) => Ok(reply.clone()),
            Err(message) => Err(ChatError::Api {
                status: 503,
                body: message.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::ChatMessage;

    #[tokio::test]
    async fn test_mock_search_is_deterministic_per_query() {
        let search = MockShoppingSearch::new(30);
        let a = search.search("silver ring", "key").await.unwrap();
        let b = search.search("silver ring", "key").await.unwrap();
        let c = search.search("steel watch", "key").await.unwrap();
        assert_eq!(a.len(), 30);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn test_mock_search_requires_key() {
        let search = MockShoppingSearch::new(5);
        assert!(matches!(
            search.search("chain", "").await,
            Err(ScrapeError::MissingApiKey)
        ));
    }

    #[tokio::test]
    async fn test_mock_chat_records_requests() {
        let chat = MockChatService::replying("Buy the Meesho one.");
        let request = ChatRequest {
            model: "m".to_string(),
            messages: vec![ChatMessage::system("ctx"), ChatMessage::user("best deal?")],
            temperature: 0.5,
            max_tokens: 500,
        };
        let reply = chat.complete("key", request).await.unwrap();
        assert_eq!(reply, "Buy the Meesho one.");
        assert_eq!(chat.requests().len(), 1);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(1299.0), "1,299");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1234567.0), "1,234,567");
    }
}
