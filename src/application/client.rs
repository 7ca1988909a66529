use crate::application::pipeline::StageEvent;
use crate::application::system::{SessionDefaults, SystemCommand, SystemHandle};
use crate::config::Mode;
use crate::domain::chat::ChatMessage;
use crate::domain::reports::AnalysisOutcome;
use anyhow::Result;
use crossbeam_channel::Receiver;

/// Unified event type for the User Interface
#[derive(Clone, Debug)]
pub enum SystemEvent {
    Stage(StageEvent),
    AnalysisReady(Box<AnalysisOutcome>),
    AnalysisFailed(String),
    ChatReply(String),
    Log(String),
}

/// UI-side handle on the runtime: non-blocking sends and polls only.
pub struct SystemClient {
    log_rx: Receiver<String>,
    handle: SystemHandle,
}

impl SystemClient {
    pub fn new(handle: SystemHandle, log_rx: Receiver<String>) -> Self {
        Self { handle, log_rx }
    }

    /// Next pending event, logs first.
    pub fn poll_next(&mut self) -> Option<SystemEvent> {
        if let Ok(msg) = self.log_rx.try_recv() {
            return Some(SystemEvent::Log(msg));
        }

        self.handle.event_rx.try_recv().ok()
    }

    pub fn run_analysis(&self, query: &str, serpapi_key: &str) -> Result<()> {
        self.send(SystemCommand::RunAnalysis {
            query: query.to_string(),
            serpapi_key: serpapi_key.to_string(),
        })
    }

    pub fn ask(
        &self,
        question: &str,
        context: &str,
        groq_key: &str,
        history: Vec<ChatMessage>,
    ) -> Result<()> {
        self.send(SystemCommand::Ask {
            question: question.to_string(),
            context: context.to_string(),
            groq_key: groq_key.to_string(),
            history,
        })
    }

    fn send(&self, command: SystemCommand) -> Result<()> {
        self.handle
            .command_tx
            .try_send(command)
            .map_err(|e| anyhow::anyhow!("Failed to send command: {}", e))
    }

    pub fn defaults(&self) -> &SessionDefaults {
        &self.handle.defaults
    }

    pub fn mode(&self) -> Mode {
        self.handle.mode
    }
}
