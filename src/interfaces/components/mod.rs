pub mod card;
pub mod charts;
pub mod table;
