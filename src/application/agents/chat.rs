use crate::config::ChatEnvConfig;
use crate::domain::chat::{ChatMessage, ChatRequest};
use crate::domain::listing::Listing;
use crate::domain::ports::ChatCompletionService;
use crate::domain::reports::{CheapestListing, Deal};
use std::sync::Arc;
use tracing::{info, warn};

pub const NO_DATA_CONTEXT: &str = "No market data available yet.";
pub const MISSING_KEY_REPLY: &str =
    "⚠️ Please enter your Groq API Key in the sidebar to use the Chatbot.";

const CONTEXT_DEALS: usize = 5;
const CONTEXT_CHEAPEST: usize = 3;

/// Summarizes the run into the text block the assistant answers from.
pub fn prepare_context(clean: &[Listing], deals: &[Deal], cheapest: &[CheapestListing]) -> String {
    if clean.is_empty() {
        return NO_DATA_CONTEXT.to_string();
    }

    let total = clean.len();
    let average = clean.iter().map(|l| l.price).sum::<f64>() / total as f64;
    let lowest = clean.iter().map(|l| l.price).fold(f64::INFINITY, f64::min);

    let deals_text: String = deals
        .iter()
        .take(CONTEXT_DEALS)
        .map(|d| {
            format!(
                "- {} at ₹{:.2} (Save ₹{:.2}, Seller: {})\n",
                d.title, d.price, d.price_difference, d.seller
            )
        })
        .collect();

    let cheap_text: String = cheapest
        .iter()
        .take(CONTEXT_CHEAPEST)
        .map(|c| format!("- {} at ₹{:.2} (Seller: {})\n", c.title, c.price, c.seller))
        .collect();

    format!(
        "MARKET ANALYSIS CONTEXT:\n\
         - Total Items Scanned: {total}\n\
         - Market Average Price: ₹{average:.2}\n\
         - Lowest Price Found: ₹{lowest:.2}\n\
         \n\
         TOP RECOMMENDED DEALS (Undervalued):\n\
         {deals_text}\n\
         LOWEST ABSOLUTE PRICES:\n\
         {cheap_text}"
    )
}

pub fn system_prompt(context: &str) -> String {
    format!(
        "You are 'Nexus AI', an expert shopping assistant.\n\
         You have access to real-time market data provided below.\n\
         \n\
         {context}\n\
         \n\
         RULES:\n\
         1. Answer specifically based on the provided data.\n\
         2. If the user asks for the \"best deal\", refer to the 'TOP RECOMMENDED DEALS' section.\n\
         3. If the user asks for the \"cheapest\", refer to the 'LOWEST ABSOLUTE PRICES'.\n\
         4. Keep answers concise, professional, and helpful.\n\
         5. All prices are in INR (₹).\n"
    )
}

/// The shopping assistant: never fails, every problem becomes reply text.
pub struct ChatAssistant {
    service: Arc<dyn ChatCompletionService>,
    config: ChatEnvConfig,
}

impl ChatAssistant {
    pub fn new(service: Arc<dyn ChatCompletionService>, config: ChatEnvConfig) -> Self {
        Self { service, config }
    }

    /// System prompt, then the tail of `history`, then the question.
    pub fn build_request(
        &self,
        question: &str,
        context: &str,
        history: &[ChatMessage],
    ) -> ChatRequest {
        let window = self.config.history_window;
        let recent = &history[history.len().saturating_sub(window)..];

        let mut messages = Vec::with_capacity(recent.len() + 2);
        messages.push(ChatMessage::system(system_prompt(context)));
        messages.extend(recent.iter().cloned());
        messages.push(ChatMessage::user(question));

        ChatRequest {
            model: self.config.model.clone(),
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    pub async fn ask(
        &self,
        question: &str,
        context: &str,
        api_key: &str,
        history: &[ChatMessage],
    ) -> String {
        if api_key.trim().is_empty() {
            return MISSING_KEY_REPLY.to_string();
        }

        let request = self.build_request(question, context, history);
        info!(
            "Chat assistant: sending {} messages to {}",
            request.messages.len(),
            request.model
        );
        match self.service.complete(api_key, request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Chat assistant error: {}", e);
                format!("❌ Error communicating with AI: {}", e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::ChatRole;
    use crate::infrastructure::mock::MockChatService;

    fn listing(price: f64) -> Listing {
        Listing {
            title: format!("Item {}", price),
            price,
            seller: "Ajio".to_string(),
            source: "Ajio".to_string(),
            rating: None,
            reviews: 0,
            link: String::new(),
            product_id: String::new(),
            history: None,
        }
    }

    fn deal(title: &str, gap: f64) -> Deal {
        Deal {
            title: title.to_string(),
            seller: "Myntra".to_string(),
            price: 100.0,
            predicted_price: 100.0 + gap,
            price_difference: gap,
            link: String::new(),
        }
    }

    #[test]
    fn test_context_without_data() {
        assert_eq!(prepare_context(&[], &[], &[]), NO_DATA_CONTEXT);
    }

    #[test]
    fn test_context_summarizes_market() {
        let clean = vec![listing(100.0), listing(300.0)];
        let deals: Vec<Deal> = (0..7).map(|i| deal(&format!("deal{}", i), 10.0)).collect();
        let cheap = vec![CheapestListing {
            title: "Snake Chain".to_string(),
            price: 1299.0,
            seller: "Ajio".to_string(),
            rating: None,
            reviews: 0,
            link: String::new(),
        }];
        let context = prepare_context(&clean, &deals, &cheap);

        assert!(context.contains("- Total Items Scanned: 2"));
        assert!(context.contains("- Market Average Price: ₹200.00"));
        assert!(context.contains("- Lowest Price Found: ₹100.00"));
        assert!(context.contains("- deal0 at ₹100.00 (Save ₹10.00, Seller: Myntra)"));
        assert!(context.ends_with("- Snake Chain at ₹1299.00 (Seller: Ajio)\n"));
        assert!(context.contains("deal4"));
        assert!(!context.contains("deal5"));
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        let service = Arc::new(MockChatService::replying("unused"));
        let assistant = ChatAssistant::new(service.clone(), ChatEnvConfig::default());
        let reply = assistant.ask("hi", "ctx", "", &[]).await;
        assert_eq!(reply, MISSING_KEY_REPLY);
        assert!(service.requests().is_empty());
    }

    #[tokio::test]
    async fn test_request_keeps_last_four_history_messages() {
        let service = Arc::new(MockChatService::replying("Go with Meesho."));
        let assistant = ChatAssistant::new(service.clone(), ChatEnvConfig::default());
        let history: Vec<ChatMessage> = (0..6)
            .map(|i| {
                if i % 2 == 0 {
                    ChatMessage::user(format!("q{}", i))
                } else {
                    ChatMessage::assistant(format!("a{}", i))
                }
            })
            .collect();

        let reply = assistant.ask("best deal?", "CTX", "key", &history).await;
        assert_eq!(reply, "Go with Meesho.");

        let requests = service.requests();
        let sent = &requests[0];
        assert_eq!(sent.messages.len(), 6);
        assert_eq!(sent.messages[0].role, ChatRole::System);
        assert!(sent.messages[0].content.contains("CTX"));
        assert!(sent.messages[0].content.contains("5. All prices are in INR (₹)."));
        assert_eq!(sent.messages[1].content, "q2");
        assert_eq!(sent.messages[5].content, "best deal?");
        assert_eq!(sent.temperature, 0.5);
        assert_eq!(sent.max_tokens, 500);
    }

    #[tokio::test]
    async fn test_service_errors_become_reply_text() {
        let assistant = ChatAssistant::new(
            Arc::new(MockChatService::failing("overloaded")),
            ChatEnvConfig::default(),
        );
        let reply = assistant.ask("hi", "ctx", "key", &[]).await;
        assert!(reply.starts_with("❌ Error communicating with AI: "));
        assert!(reply.contains("overloaded"));
    }
}
