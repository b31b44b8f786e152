pub mod emotion;

pub use emotion::{EmotionLabel, UnknownEmotion};
