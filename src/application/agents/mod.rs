//! Pipeline stages, the chat assistant and the dashboard session.

pub mod analyst;
pub mod chat;
pub mod comparator;
pub mod predictor;
pub mod scraper;
pub mod user_agent;

pub use analyst::AnalystAgent;
pub use chat::ChatAssistant;
pub use comparator::{ComparatorAgent, ComparisonReport};
pub use predictor::{PredictionReport, PredictorAgent};
pub use scraper::ScraperAgent;
pub use user_agent::{DashboardTab, UserAgent};
