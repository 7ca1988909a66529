pub mod core;
pub mod export;
pub mod groq;
pub mod mock;
pub mod price_api;
pub mod serpapi;
