pub mod chat;
pub mod errors;
pub mod listing;
pub mod ports;
pub mod reports;
