/// Thresholds for batching and scoring emotion samples.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Samples per batch; the window is evaluated and cleared when it fills
    pub capacity: usize,

    /// Distinct emotions in one batch at or above which distress is signalled
    pub unique_threshold: usize,

    /// The most common emotion must cover at least this share of the batch
    pub majority_ratio: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            unique_threshold: 3,
            majority_ratio: 0.5,
        }
    }
}
