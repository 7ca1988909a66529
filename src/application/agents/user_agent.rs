use crate::application::agents::chat::{NO_DATA_CONTEXT, prepare_context};
use crate::application::client::{SystemClient, SystemEvent};
use crate::application::pipeline::{Stage, StageEvent, StageStatus};
use crate::domain::chat::ChatMessage;
use crate::domain::reports::AnalysisOutcome;
use std::collections::VecDeque;
use tracing::{debug, error};

const MAX_LOG_LINES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardTab {
    Cheapest,
    PriceHistory,
    Deals,
    MarketAnalysis,
    ModelInsights,
    RawData,
    Assistant,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 7] = [
        DashboardTab::Cheapest,
        DashboardTab::PriceHistory,
        DashboardTab::Deals,
        DashboardTab::MarketAnalysis,
        DashboardTab::ModelInsights,
        DashboardTab::RawData,
        DashboardTab::Assistant,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DashboardTab::Cheapest => "💰 Cheapest Listings",
            DashboardTab::PriceHistory => "📈 Price History Deal",
            DashboardTab::Deals => "💎 Potential Deals (AI)",
            DashboardTab::MarketAnalysis => "📊 Market Analysis",
            DashboardTab::ModelInsights => "🧠 Model Insights",
            DashboardTab::RawData => "🗃️ Raw Data",
            DashboardTab::Assistant => "🤖 Shopping Assistant",
        }
    }
}

/// Dashboard session: sidebar inputs, run progress, results and chat.
pub struct UserAgent {
    client: SystemClient,

    // Sidebar
    pub serpapi_key: String,
    pub groq_key: String,
    pub query: String,

    // Run state
    pub stages: Vec<StageEvent>,
    pub running: bool,
    pub error: Option<String>,
    pub outcome: Option<AnalysisOutcome>,

    // Chat
    pub chat_messages: Vec<ChatMessage>,
    pub chat_input: String,
    pub awaiting_reply: bool,

    pub logs: VecDeque<String>,
    pub selected_tab: DashboardTab,
}

impl UserAgent {
    pub fn new(client: SystemClient) -> Self {
        let defaults = client.defaults().clone();
        Self {
            client,
            serpapi_key: defaults.serpapi_key,
            groq_key: defaults.groq_key,
            query: defaults.query,
            stages: Vec::new(),
            running: false,
            error: None,
            outcome: None,
            chat_messages: Vec::new(),
            chat_input: String::new(),
            awaiting_reply: false,
            logs: VecDeque::new(),
            selected_tab: DashboardTab::Cheapest,
        }
    }

    pub fn client(&self) -> &SystemClient {
        &self.client
    }

    /// "🚀 Run Analysis": clears the previous run and queues a new one.
    pub fn run_analysis(&mut self) {
        self.outcome = None;
        self.error = None;
        self.stages.clear();

        match self.client.run_analysis(&self.query, &self.serpapi_key) {
            Ok(()) => self.running = true,
            Err(e) => {
                error!("UserAgent: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    /// Context the assistant answers from; the current run or nothing.
    pub fn chat_context(&self) -> String {
        match &self.outcome {
            Some(o) => prepare_context(&o.clean, &o.deals, &o.cheapest),
            None => NO_DATA_CONTEXT.to_string(),
        }
    }

    pub fn send_chat(&mut self) {
        let question = self.chat_input.trim().to_string();
        if question.is_empty() || self.awaiting_reply {
            return;
        }
        self.chat_input.clear();

        let history = self.chat_messages.clone();
        self.chat_messages.push(ChatMessage::user(question.clone()));

        match self
            .client
            .ask(&question, &self.chat_context(), &self.groq_key, history)
        {
            Ok(()) => self.awaiting_reply = true,
            Err(e) => {
                error!("UserAgent: {}", e);
                self.chat_messages
                    .push(ChatMessage::assistant(format!("❌ Error communicating with AI: {}", e)));
            }
        }
    }

    pub fn stage_status(&self, stage: Stage) -> Option<&StageStatus> {
        self.stages
            .iter()
            .rev()
            .find(|e| e.stage == stage)
            .map(|e| &e.status)
    }

    /// Drains everything the runtime has published since the last frame.
    pub fn update(&mut self) {
        while let Some(event) = self.client.poll_next() {
            match event {
                SystemEvent::Log(line) => {
                    self.logs.push_back(line.trim_end().to_string());
                    while self.logs.len() > MAX_LOG_LINES {
                        self.logs.pop_front();
                    }
                }
                SystemEvent::Stage(stage) => {
                    debug!("UserAgent: {:?} {:?}", stage.stage, stage.status);
                    self.stages.push(stage);
                }
                SystemEvent::AnalysisReady(outcome) => {
                    self.running = false;
                    self.outcome = Some(*outcome);
                }
                SystemEvent::AnalysisFailed(message) => {
                    self.running = false;
                    self.error = Some(message);
                }
                SystemEvent::ChatReply(reply) => {
                    self.awaiting_reply = false;
                    self.chat_messages.push(ChatMessage::assistant(reply));
                }
            }
        }
    }
}
