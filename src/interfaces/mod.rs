pub mod format;

#[cfg(feature = "ui")]
pub mod components;
#[cfg(feature = "ui")]
pub mod dashboard;
#[cfg(feature = "ui")]
pub mod design_system;
#[cfg(feature = "ui")]
pub mod ui;
#[cfg(feature = "ui")]
pub mod view_models;
