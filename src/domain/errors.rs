use thiserror::Error;

/// Errors raised while fetching listings from the shopping-search provider
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("API key is required")]
    MissingApiKey,

    #[error("No results found for '{query}'")]
    NoResults { query: String },

    #[error("Search provider error: {message}")]
    Provider { message: String },

    #[error("Search request failed: {0}")]
    Transport(#[from] anyhow::Error),
}

/// Errors raised by the cleaning/analysis stage
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No data to analyze")]
    EmptyInput,

    #[error("No valid data after cleaning ({dropped} rows dropped)")]
    NoValidRows { dropped: usize },
}

/// Errors raised by a price-history source
#[derive(Debug, Error)]
pub enum PriceHistoryError {
    #[error("Price API returned no history for {key}")]
    NoHistory { key: String },

    #[error("Price API rejected request: status {status}")]
    Rejected { status: u16 },

    #[error("Price API request failed: {0}")]
    Transport(#[from] anyhow::Error),
}

/// Errors raised while fitting or applying the price model
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Not enough complete data to build a model: {rows} rows < {required}")]
    InsufficientData { rows: usize, required: usize },

    #[error("Not enough data to train model after split")]
    EmptyTrainingSplit,

    #[error("Model training failed: {reason}")]
    TrainingFailed { reason: String },

    #[error("Prediction failed: {reason}")]
    PredictionFailed { reason: String },
}

/// Errors raised by the chat-completion provider
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Chat API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Chat API returned no choices")]
    EmptyResponse,

    #[error("Chat request failed: {0}")]
    Transport(#[from] anyhow::Error),
}

/// Errors that stop the analysis pipeline before any report exists
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Please enter an API key.")]
    MissingApiKey,

    #[error("Please enter a product query.")]
    MissingQuery,

    #[error("Agent 1 failed: No data was scraped.")]
    NoData(#[source] ScrapeError),

    #[error("Agent 2 failed: {0}")]
    Analysis(#[from] AnalysisError),
}
