// Pipeline stages and the chat assistant
pub mod agents;

// Price history summary and simulation
pub mod history;

// Fair-price regression
pub mod ml;

pub mod pipeline;

// Runtime and UI-side handle
pub mod client;
pub mod system;
