use crate::config::ChatEnvConfig;
use crate::domain::chat::ChatRequest;
use crate::domain::errors::ChatError;
use crate::domain::ports::ChatCompletionService;
use crate::infrastructure::core::HttpClientFactory;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct GroqChatClient {
    client: ClientWithMiddleware,
    url: String,
}

impl GroqChatClient {
    pub fn new(config: &ChatEnvConfig) -> Self {
        Self {
            client: HttpClientFactory::create_client(),
            url: config.base_url.clone(),
        }
    }
}

#[async_trait]
impl ChatCompletionService for GroqChatClient {
    async fn complete(&self, api_key: &str, request: ChatRequest) -> Result<String, ChatError> {
        let payload = serde_json::to_vec(&request).context("Failed to encode chat request")?;
        debug!(
            "Sending {} chat messages to {} (model {})",
            request.messages.len(),
            self.url,
            request.model
        );

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .context("Failed to send request to Groq")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: CompletionResponse = response
            .json()
            .await
            .context("Failed to parse Groq response")?;

        extract_reply(body)
    }
}

fn extract_reply(body: CompletionResponse) -> Result<String, ChatError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(ChatError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::ChatMessage;

    #[test]
    fn test_request_serializes_as_openai_payload() {
        let request = ChatRequest {
            model: "llama-3.3-70b-versatile".to_string(),
            messages: vec![ChatMessage::system("ctx"), ChatMessage::user("cheapest?")],
            temperature: 0.5,
            max_tokens: 500,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["messages"][1]["content"], "cheapest?");
        assert_eq!(value["max_tokens"], 500);
    }

    #[test]
    fn test_extract_reply_takes_first_choice() {
        let body: CompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Try Amazon.in"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_reply(body).unwrap(), "Try Amazon.in");
    }

    #[test]
    fn test_extract_reply_without_choices() {
        let body: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(extract_reply(body), Err(ChatError::EmptyResponse)));
    }
}
