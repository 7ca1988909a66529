//! Price regression: feature encoding and the random-forest model.

pub mod encoder;
pub mod price_model;

pub use encoder::FeatureEncoder;
pub use price_model::PriceModel;
