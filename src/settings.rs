use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

use crate::intervention::InterventionConfig;
use crate::window::WindowConfig;

/// Tunable constants for one monitoring session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MonitorSettings {
    /// Minimum spacing between frames sent for classification
    pub sample_interval_ms: u64,
    pub window_size: usize,
    /// Distinct emotions per window at or above which a break is suggested
    pub unique_emotion_threshold: usize,
    /// Share of the window the most common emotion must reach to count as stable
    pub majority_ratio: f64,
    /// Padding around the landmark bounding box, in source pixels
    pub crop_padding_px: u32,
    pub prompt_auto_dismiss_secs: u64,
    pub cooldown_secs: u64,
    pub break_durations_secs: Vec<u64>,
    pub countdown_tick_ms: u64,
    pub classifier_url: String,
    pub classifier_timeout_ms: u64,
    /// Skip classifier calls entirely while a prompt, break or cooldown is active
    pub pause_sampling_while_engaged: bool,
    pub debug: bool,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            sample_interval_ms: 500,
            window_size: 10,
            unique_emotion_threshold: 3,
            majority_ratio: 0.5,
            crop_padding_px: 20,
            prompt_auto_dismiss_secs: 15,
            cooldown_secs: 60,
            break_durations_secs: vec![120, 300, 600],
            countdown_tick_ms: 1000,
            classifier_url: "http://127.0.0.1:5000/emotion".into(),
            classifier_timeout_ms: 5000,
            pause_sampling_while_engaged: false,
            debug: false,
        }
    }
}

impl MonitorSettings {
    /// Reads settings from a JSON file. A missing file yields the defaults;
    /// keys absent from the file keep their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("MOODBREAK_CLASSIFIER_URL") {
            if !url.trim().is_empty() {
                self.classifier_url = url;
            }
        }
        if let Ok(value) = std::env::var("MOODBREAK_DEBUG") {
            self.debug = value == "1" || value.eq_ignore_ascii_case("true");
        }
        self
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn classifier_timeout(&self) -> Duration {
        Duration::from_millis(self.classifier_timeout_ms)
    }

    pub fn window_config(&self) -> WindowConfig {
        WindowConfig {
            capacity: self.window_size,
            unique_threshold: self.unique_emotion_threshold,
            majority_ratio: self.majority_ratio,
        }
    }

    pub fn intervention_config(&self) -> InterventionConfig {
        InterventionConfig {
            auto_dismiss: Duration::from_secs(self.prompt_auto_dismiss_secs),
            cooldown: Duration::from_secs(self.cooldown_secs),
            countdown_tick: Duration::from_millis(self.countdown_tick_ms),
            break_durations_secs: self.break_durations_secs.clone(),
        }
    }
}
