pub mod aggregator;
pub mod config;
pub mod scoring;

pub use aggregator::WindowAggregator;
pub use config::WindowConfig;
pub use scoring::{evaluate_window, DistressVerdict};
