//! Google Shopping results via SerpApi.

mod client;

pub use client::{SerpApiClient, parse_shopping_results};
