pub mod commands;
pub mod events;
pub mod prompts;

pub use commands::{PresentationBridge, UserAction};
pub use events::{ChannelEmitter, LogEmitter, StateChange, StateEmitter, StatePayload};
pub use prompts::{default_prompt_variants, format_countdown, pick_variant, PromptVariant};
