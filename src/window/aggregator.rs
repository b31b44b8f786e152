use crate::models::EmotionLabel;

use super::config::WindowConfig;
use super::scoring::{evaluate_window, DistressVerdict};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Batches incoming samples into non-overlapping windows of `capacity`.
#[derive(Debug)]
pub struct WindowAggregator {
    config: WindowConfig,
    window: Vec<EmotionLabel>,
    evaluated_windows: u64,
}

impl WindowAggregator {
    pub fn new(config: WindowConfig) -> Self {
        let capacity = config.capacity.max(1);
        Self {
            config: WindowConfig { capacity, ..config },
            window: Vec::with_capacity(capacity),
            evaluated_windows: 0,
        }
    }

    /// Appends one sample. When the window reaches capacity it is evaluated
    /// and cleared, whatever the verdict.
    pub fn observe(&mut self, label: EmotionLabel) -> Option<DistressVerdict> {
        self.window.push(label);
        if self.window.len() < self.config.capacity {
            return None;
        }

        let verdict = evaluate_window(&self.window, &self.config);
        self.window.clear();
        self.evaluated_windows += 1;

        if let Some(v) = &verdict {
            log_info!(
                "window #{} evaluated: unique={} mode={} x{} latest={} trigger={}",
                self.evaluated_windows,
                v.unique_count,
                v.mode,
                v.mode_count,
                v.display_label,
                v.trigger
            );
        }
        verdict
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn evaluated_windows(&self) -> u64 {
        self.evaluated_windows
    }
}
