pub mod http;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::models::EmotionLabel;

pub use http::HttpClassifier;

/// JPEG-encoded face crop as sent over the wire.
#[derive(Debug, Clone)]
pub struct FaceImage {
    pub jpeg: Vec<u8>,
}

/// Reasons a classification produced no sample. None of these are fatal;
/// the monitor logs and drops them.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("classifier request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("classifier returned status {0}")]
    Status(u16),
    #[error("classifier response was malformed: {0}")]
    Malformed(String),
    #[error("classifier returned unrecognized label '{0}'")]
    Unrecognized(String),
    #[error("classifier call timed out after {0:?}")]
    TimedOut(Duration),
    #[error("face crop could not be encoded: {0}")]
    Encode(String),
}

/// Remote emotion model. One call per face crop, no retries.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    async fn classify(&self, face: FaceImage) -> Result<EmotionLabel, ClassifyError>;
}
