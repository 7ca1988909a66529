//! Report rows and chart series produced by the analysis stages.

use crate::domain::listing::{Listing, RawListing};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of rows kept in the cheapest-listings report.
pub const CHEAPEST_LIMIT: usize = 10;
/// Number of rows kept in the historical-value report.
pub const HISTORICAL_LIMIT: usize = 10;
/// Number of features kept in the importance table.
pub const IMPORTANCE_LIMIT: usize = 15;
/// Number of sellers drawn in the top-sellers bar chart.
pub const TOP_SELLERS_LIMIT: usize = 15;
/// Bins in the price histogram.
pub const HISTOGRAM_BINS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheapestListing {
    pub title: String,
    pub price: f64,
    pub seller: String,
    pub rating: Option<f64>,
    pub reviews: u64,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerReport {
    pub seller: String,
    pub num_listings: usize,
    pub min_price: f64,
    pub avg_price: f64,
    pub max_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDeal {
    pub title: String,
    pub seller: String,
    pub price: f64,
    pub historic_avg_price: f64,
    #[serde(rename = "historical_saving_%")]
    pub historical_saving_pct: f64,
    #[serde(rename = "24h_price_change_%")]
    pub price_change_24h_pct: f64,
    pub price_volatility: f64,
    pub link: String,
}

/// A listing ranked by how far its price sits below the model's estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub title: String,
    pub seller: String,
    pub price: f64,
    pub predicted_price: f64,
    /// predicted_price - price; positive means cheaper than expected.
    pub price_difference: f64,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Held-out fit quality of the price model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelQuality {
    pub train_rows: usize,
    pub test_rows: usize,
    pub rmse: f64,
    pub r_squared: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistogram {
    pub bins: Vec<HistogramBin>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub rating: f64,
    pub price: f64,
    /// Marker area, proportional to the (clipped) review count.
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerCount {
    pub seller: String,
    pub listings: usize,
}

/// The three market-analysis charts. Optional charts are absent when the
/// clean table has nothing to draw for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSet {
    pub price_histogram: PriceHistogram,
    pub price_vs_rating: Option<Vec<ScatterPoint>>,
    /// Ascending by count, ready for a horizontal bar chart.
    pub top_sellers: Option<Vec<SellerCount>>,
}

/// Everything one analysis run produced, in the order the stages built it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub query: String,
    pub raw: Vec<RawListing>,
    pub clean: Vec<Listing>,
    pub charts: ChartSet,
    pub importance: Vec<FeatureImportance>,
    pub deals: Vec<Deal>,
    pub model_quality: Option<ModelQuality>,
    pub cheapest: Vec<CheapestListing>,
    pub seller_report: Vec<SellerReport>,
    pub historic_report: Vec<HistoricalDeal>,
}

impl AnalysisOutcome {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            query: query.into(),
            raw: Vec::new(),
            clean: Vec::new(),
            charts: ChartSet::default(),
            importance: Vec::new(),
            deals: Vec::new(),
            model_quality: None,
            cheapest: Vec::new(),
            seller_report: Vec::new(),
            historic_report: Vec::new(),
        }
    }

    /// Whether Agent 3 produced anything to show.
    pub fn has_model(&self) -> bool {
        !self.deals.is_empty()
    }
}

