use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dominant emotion reported by the classifier for one face crop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
}

impl EmotionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Angry => "angry",
            EmotionLabel::Disgust => "disgust",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Happy => "happy",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Surprise => "surprise",
            EmotionLabel::Neutral => "neutral",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEmotion(pub String);

impl fmt::Display for UnknownEmotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized emotion label '{}'", self.0)
    }
}

impl std::error::Error for UnknownEmotion {}

impl FromStr for EmotionLabel {
    type Err = UnknownEmotion;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "angry" => Ok(EmotionLabel::Angry),
            "disgust" => Ok(EmotionLabel::Disgust),
            "fear" => Ok(EmotionLabel::Fear),
            "happy" => Ok(EmotionLabel::Happy),
            "sad" => Ok(EmotionLabel::Sad),
            // DeepFace reports "surprise"; older builds used "surprised"
            "surprise" | "surprised" => Ok(EmotionLabel::Surprise),
            "neutral" => Ok(EmotionLabel::Neutral),
            _ => Err(UnknownEmotion(raw.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_classifier_labels_case_insensitively() {
        assert_eq!("Happy".parse::<EmotionLabel>(), Ok(EmotionLabel::Happy));
        assert_eq!(" neutral ".parse::<EmotionLabel>(), Ok(EmotionLabel::Neutral));
        assert_eq!("surprised".parse::<EmotionLabel>(), Ok(EmotionLabel::Surprise));
    }

    #[test]
    fn rejects_unknown_fallback_label() {
        let err = "unknown".parse::<EmotionLabel>().unwrap_err();
        assert_eq!(err, UnknownEmotion("unknown".into()));
    }
}
