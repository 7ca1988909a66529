//! Groq-hosted chat models over the OpenAI-compatible completions API.

mod client;

pub use client::GroqChatClient;
