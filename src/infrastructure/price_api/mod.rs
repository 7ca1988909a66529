//! Price-history sources: a hosted Price API and the offline simulation.

mod http;
mod simulated;

pub use http::HttpPriceHistory;
pub use simulated::SimulatedPriceHistory;
