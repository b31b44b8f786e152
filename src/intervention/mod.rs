pub mod controller;
pub mod state;

pub use controller::{InterventionConfig, InterventionController};
pub use state::{CooldownReason, InterventionState, SchedulerState};
