use crate::application::agents::{
    AnalystAgent, ComparatorAgent, PredictorAgent, ScraperAgent,
};
use crate::domain::errors::PipelineError;
use crate::domain::reports::AnalysisOutcome;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Scrape,
    Analyze,
    Predict,
    Compare,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Scrape, Stage::Analyze, Stage::Predict, Stage::Compare];

    /// Text shown while the stage runs.
    pub fn running_label(&self) -> &'static str {
        match self {
            Stage::Scrape => "🕵️ Agent 1: Scraping data...",
            Stage::Analyze => "📈 Agent 2: Analyzing and plotting (and calling Price API)...",
            Stage::Predict => "🤖 Agent 3: Building prediction model...",
            Stage::Compare => "🔄 Agent 4: Comparing prices...",
        }
    }

    pub fn done_label(&self) -> &'static str {
        match self {
            Stage::Scrape => "Agent 1: Scraping complete!",
            Stage::Analyze => "Agent 2: Analysis complete!",
            Stage::Predict => "Agent 3: Prediction complete!",
            Stage::Compare => "Agent 4: Comparison complete!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageStatus {
    Started,
    Completed,
    /// The stage could not produce output; the message says why.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    pub stage: Stage,
    pub status: StageStatus,
}

impl StageEvent {
    fn new(stage: Stage, status: StageStatus) -> Self {
        Self { stage, status }
    }
}

/// Runs the four agents in order for one query.
pub struct AnalysisPipeline {
    scraper: ScraperAgent,
    analyst: AnalystAgent,
    predictor: PredictorAgent,
    comparator: ComparatorAgent,
}

impl AnalysisPipeline {
    pub fn new(
        scraper: ScraperAgent,
        analyst: AnalystAgent,
        predictor: PredictorAgent,
        comparator: ComparatorAgent,
    ) -> Self {
        Self {
            scraper,
            analyst,
            predictor,
            comparator,
        }
    }

    /// Validates the inputs, then scrape → analyze → predict → compare.
    /// Only a failed scrape aborts. A failed analysis skips prediction and a
    /// failed prediction leaves the model reports empty.
    pub async fn run<F>(
        &self,
        query: &str,
        api_key: &str,
        progress: F,
    ) -> Result<AnalysisOutcome, PipelineError>
    where
        F: Fn(StageEvent) + Send + Sync,
    {
        if api_key.trim().is_empty() {
            return Err(PipelineError::MissingApiKey);
        }
        let query = query.trim();
        if query.is_empty() {
            return Err(PipelineError::MissingQuery);
        }

        let mut outcome = AnalysisOutcome::new(query);
        info!("Starting analysis run {} for '{}'", outcome.run_id, query);

        progress(StageEvent::new(Stage::Scrape, StageStatus::Started));
        outcome.raw = match self.scraper.run(query, api_key).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("[Agent 1: Scraper] {}", e);
                let err = PipelineError::NoData(e);
                progress(StageEvent::new(Stage::Scrape, StageStatus::Failed(err.to_string())));
                return Err(err);
            }
        };
        progress(StageEvent::new(Stage::Scrape, StageStatus::Completed));

        // Unusable rows still produce an outcome so the raw data can be inspected.
        progress(StageEvent::new(Stage::Analyze, StageStatus::Started));
        let analyzed = match self.analyst.run(&outcome.raw).await {
            Ok((clean, charts)) => {
                outcome.clean = clean;
                outcome.charts = charts;
                progress(StageEvent::new(Stage::Analyze, StageStatus::Completed));
                true
            }
            Err(e) => {
                let err = PipelineError::from(e);
                warn!("[Agent 2: Analyst] {}", err);
                progress(StageEvent::new(Stage::Analyze, StageStatus::Failed(err.to_string())));
                false
            }
        };

        if analyzed {
            progress(StageEvent::new(Stage::Predict, StageStatus::Started));
            match self.predictor.run(&outcome.clean) {
                Ok(report) => {
                    outcome.importance = report.importance;
                    outcome.deals = report.deals;
                    outcome.model_quality = Some(report.quality);
                    progress(StageEvent::new(Stage::Predict, StageStatus::Completed));
                }
                Err(e) => {
                    warn!("[Agent 3: Predictor] {}", e);
                    progress(StageEvent::new(Stage::Predict, StageStatus::Failed(e.to_string())));
                }
            }
        }

        progress(StageEvent::new(Stage::Compare, StageStatus::Started));
        let comparison = self.comparator.run(&outcome.clean);
        outcome.cheapest = comparison.cheapest;
        outcome.seller_report = comparison.seller_report;
        outcome.historic_report = comparison.historic_report;
        progress(StageEvent::new(Stage::Compare, StageStatus::Completed));

        info!(
            "Analysis run {} finished: {} raw, {} clean, {} deals",
            outcome.run_id,
            outcome.raw.len(),
            outcome.clean.len(),
            outcome.deals.len()
        );
        Ok(outcome)
    }
}
