use anyhow::Result;
use crossbeam_channel::Sender;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::application::agents::{
    AnalystAgent, ChatAssistant, ComparatorAgent, PredictorAgent, ScraperAgent,
};
use crate::application::client::SystemEvent;
use crate::application::pipeline::AnalysisPipeline;
use crate::config::{Config, Mode};
use crate::domain::chat::ChatMessage;
use crate::domain::ports::{ChatCompletionService, PriceHistoryProvider, ShoppingSearchService};
use crate::infrastructure::groq::GroqChatClient;
use crate::infrastructure::mock::{MockChatService, MockShoppingSearch};
use crate::infrastructure::price_api::{HttpPriceHistory, SimulatedPriceHistory};
use crate::infrastructure::serpapi::SerpApiClient;

/// Key the dashboard pre-fills in mock mode, where no provider checks it.
pub const MOCK_API_KEY: &str = "mock";

const COMMAND_BUFFER: usize = 16;

/// Requests the dashboard can make of the runtime.
#[derive(Debug, Clone)]
pub enum SystemCommand {
    RunAnalysis {
        query: String,
        serpapi_key: String,
    },
    Ask {
        question: String,
        context: String,
        groq_key: String,
        history: Vec<ChatMessage>,
    },
}

/// Values the sidebar starts with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionDefaults {
    pub serpapi_key: String,
    pub groq_key: String,
    pub query: String,
}

pub struct SystemHandle {
    pub command_tx: mpsc::Sender<SystemCommand>,
    pub event_rx: crossbeam_channel::Receiver<SystemEvent>,
    pub defaults: SessionDefaults,
    pub mode: Mode,
}

pub struct Application {
    pub config: Config,
    pub pipeline: Arc<AnalysisPipeline>,
    pub assistant: Arc<ChatAssistant>,
}

impl Application {
    pub async fn build(config: Config) -> Result<Self> {
        info!("Building DealScout Application (Mode: {:?})...", config.mode);

        let (search, chat): (Arc<dyn ShoppingSearchService>, Arc<dyn ChatCompletionService>) =
            match config.mode {
                Mode::Mock => {
                    info!("Using Mock services");
                    (
                        Arc::new(MockShoppingSearch::new(config.search.num_results)),
                        Arc::new(MockChatService::new()),
                    )
                }
                Mode::Live => {
                    info!("Using SerpApi ({})", config.search.base_url);
                    (
                        Arc::new(SerpApiClient::new(&config.search)),
                        Arc::new(GroqChatClient::new(&config.chat)),
                    )
                }
            };

        let simulated: Arc<dyn PriceHistoryProvider> =
            Arc::new(SimulatedPriceHistory::new(config.history.days));
        let history: Arc<dyn PriceHistoryProvider> = match (config.mode, HttpPriceHistory::from_config(&config.history)) {
            (Mode::Live, Some(api)) => {
                info!("Price history from Price API");
                Arc::new(api)
            }
            _ => {
                info!("Price history is simulated");
                simulated.clone()
            }
        };

        let pipeline = AnalysisPipeline::new(
            ScraperAgent::new(search),
            AnalystAgent::new(
                history,
                simulated,
                config.history.sample_size,
                config.history.failure_threshold,
            ),
            PredictorAgent::new(config.model.clone()),
            ComparatorAgent::new(),
        );
        let assistant = ChatAssistant::new(chat, config.chat.clone());

        Ok(Self {
            config,
            pipeline: Arc::new(pipeline),
            assistant: Arc::new(assistant),
        })
    }

    pub fn defaults(&self) -> SessionDefaults {
        let fill = |key: &str| match (self.config.mode, key.is_empty()) {
            (Mode::Mock, true) => MOCK_API_KEY.to_string(),
            _ => key.to_string(),
        };
        SessionDefaults {
            serpapi_key: fill(&self.config.search.api_key),
            groq_key: fill(&self.config.chat.api_key),
            query: self.config.search.default_query.clone(),
        }
    }

    /// Spawns the command worker on the current runtime.
    pub async fn start(self) -> Result<SystemHandle> {
        let (command_tx, mut command_rx) = mpsc::channel::<SystemCommand>(COMMAND_BUFFER);
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let defaults = self.defaults();
        let mode = self.config.mode;

        let pipeline = self.pipeline.clone();
        let assistant = self.assistant.clone();
        tokio::spawn(async move {
            info!("Command worker started");
            while let Some(command) = command_rx.recv().await {
                let events = event_tx.clone();
                match command {
                    SystemCommand::RunAnalysis { query, serpapi_key } => {
                        let pipeline = pipeline.clone();
                        tokio::spawn(async move {
                            run_analysis(&pipeline, &query, &serpapi_key, &events).await;
                        });
                    }
                    SystemCommand::Ask {
                        question,
                        context,
                        groq_key,
                        history,
                    } => {
                        let assistant = assistant.clone();
                        tokio::spawn(async move {
                            let reply = assistant
                                .ask(&question, &context, &groq_key, &history)
                                .await;
                            publish(&events, SystemEvent::ChatReply(reply));
                        });
                    }
                }
            }
            warn!("Command channel closed, worker stopping");
        });

        Ok(SystemHandle {
            command_tx,
            event_rx,
            defaults,
            mode,
        })
    }
}

async fn run_analysis(
    pipeline: &AnalysisPipeline,
    query: &str,
    api_key: &str,
    events: &Sender<SystemEvent>,
) {
    let result = pipeline
        .run(query, api_key, |stage| publish(events, SystemEvent::Stage(stage)))
        .await;
    match result {
        Ok(outcome) => publish(events, SystemEvent::AnalysisReady(Box::new(outcome))),
        Err(e) => {
            error!("Analysis failed: {}", e);
            publish(events, SystemEvent::AnalysisFailed(e.to_string()));
        }
    }
}

fn publish(events: &Sender<SystemEvent>, event: SystemEvent) {
    if events.send(event).is_err() {
        warn!("Dashboard disconnected, dropping event");
    }
}
