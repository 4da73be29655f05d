//! Core business logic: period resolution, dataset handling and views

pub mod config;
pub mod dataset;
pub mod error;
pub mod fill;
pub mod log;
pub mod periods;
pub mod record;
pub mod views;

// Re-export main types for cleaner imports
pub use error::PeriodError;
pub use periods::{DateInterval, PeriodResolver, Preset, previous_equivalent_window};
pub use record::BrokerRecord;
