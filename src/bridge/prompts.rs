use rand::Rng;
use serde::{Deserialize, Serialize};

/// One attention-getting heading shown when a break is suggested.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptVariant {
    pub emoji: String,
    pub text: String,
}

impl PromptVariant {
    pub fn new(emoji: &str, text: &str) -> Self {
        Self {
            emoji: emoji.to_string(),
            text: text.to_string(),
        }
    }
}

pub fn default_prompt_variants() -> Vec<PromptVariant> {
    vec![
        PromptVariant::new("🕊️", "Taking a moment might help you refocus."),
        PromptVariant::new("🐢", "No rush, smart minds take mindful pauses!"),
        PromptVariant::new("📘", "You seem a bit distracted, need a quick pause?"),
        PromptVariant::new("💭", "Lost in thought? I got you!"),
        PromptVariant::new("🧠", "You seem tense or distracted!"),
        PromptVariant::new("🌥️", "Cloudy brain weather detected!"),
    ]
}

/// Uniform pick from `variants`; `None` only when the set is empty.
pub fn pick_variant<'a, R: Rng + ?Sized>(
    rng: &mut R,
    variants: &'a [PromptVariant],
) -> Option<&'a PromptVariant> {
    if variants.is_empty() {
        return None;
    }
    variants.get(rng.gen_range(0..variants.len()))
}

/// Renders a countdown as `MM:SS`. Minutes keep growing past 99.
pub fn format_countdown(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
