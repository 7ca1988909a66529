use serde::{Deserialize, Serialize};

/// One flattened shopping result, exactly as the search provider returned it.
///
/// Numeric columns are kept as text here; coercion happens in the analyst
/// stage so the raw tab can show what was actually scraped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    pub title: String,
    pub price: Option<String>,
    pub source: String,
    pub seller: String,
    pub link: String,
    pub rating: Option<String>,
    pub reviews: Option<String>,
    pub product_id: String,
    pub thumbnail: String,
    pub delivery: String,
}

impl Default for RawListing {
    fn default() -> Self {
        Self {
            title: "N/A".to_string(),
            price: None,
            source: "Unknown".to_string(),
            seller: "Unknown".to_string(),
            link: String::new(),
            rating: None,
            reviews: None,
            product_id: String::new(),
            thumbnail: String::new(),
            delivery: "N/A".to_string(),
        }
    }
}

/// Price-tracking figures attached to a listing by the history sub-stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub historic_avg_price: f64,
    /// Standard deviation of the sampled prices divided by their mean.
    pub price_volatility: f64,
    /// Fractional move versus the previous day (0.05 = +5%).
    pub price_change_24h: f64,
}

/// A row of the clean table: price is always present, finite and positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    pub price: f64,
    pub seller: String,
    pub source: String,
    pub rating: Option<f64>,
    pub reviews: u64,
    pub link: String,
    pub product_id: String,
    pub history: Option<PriceHistory>,
}

impl Listing {
    /// Identifier used when asking the price API about this listing.
    /// Falls back to the link, then the title, when the provider gave no id.
    pub fn tracking_key(&self) -> &str {
        if !self.product_id.is_empty() {
            &self.product_id
        } else if !self.link.is_empty() {
            &self.link
        } else {
            &self.title
        }
    }
}
