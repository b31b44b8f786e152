use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::intervention::{CooldownReason, InterventionState, SchedulerState};
use crate::models::EmotionLabel;

use super::prompts::format_countdown;

/// What the presentation layer needs to render the current state.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StatePayload {
    Idle,
    #[serde(rename_all = "camelCase")]
    Prompt {
        emoji: String,
        heading: String,
        detected_emotion: Option<EmotionLabel>,
    },
    #[serde(rename_all = "camelCase")]
    Countdown {
        remaining_secs: u64,
        total_secs: u64,
        display: String,
    },
    #[serde(rename_all = "camelCase")]
    Cooldown { reason: Option<CooldownReason> },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChange {
    pub state: SchedulerState,
    pub payload: StatePayload,
    pub emitted_at: DateTime<Utc>,
}

impl StateChange {
    pub fn from_state(state: &InterventionState) -> Self {
        let payload = match state.status {
            SchedulerState::Idle => StatePayload::Idle,
            SchedulerState::PromptShown => {
                let (emoji, heading) = state
                    .prompt
                    .as_ref()
                    .map(|p| (p.emoji.clone(), p.text.clone()))
                    .unwrap_or_default();
                StatePayload::Prompt {
                    emoji,
                    heading,
                    detected_emotion: state.trigger_emotion,
                }
            }
            SchedulerState::BreakRunning => StatePayload::Countdown {
                remaining_secs: state.break_remaining_secs,
                total_secs: state.break_total_secs,
                display: format_countdown(state.break_remaining_secs),
            },
            SchedulerState::Cooldown => StatePayload::Cooldown {
                reason: state.last_reason,
            },
        };

        Self {
            state: state.status,
            payload,
            emitted_at: Utc::now(),
        }
    }
}

/// Outbound seam to whatever renders the scheduler (window, overlay, CLI).
pub trait StateEmitter: Send + Sync {
    fn emit(&self, change: &StateChange);
}

/// Forwards every change into an unbounded channel. Sends after the
/// receiver is gone are dropped.
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    tx: mpsc::UnboundedSender<StateChange>,
}

impl ChannelEmitter {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StateChange>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl StateEmitter for ChannelEmitter {
    fn emit(&self, change: &StateChange) {
        let _ = self.tx.send(change.clone());
    }
}

/// Writes each change to the log as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEmitter;

impl StateEmitter for LogEmitter {
    fn emit(&self, change: &StateChange) {
        match serde_json::to_string(change) {
            Ok(json) => log::info!("state-changed {json}"),
            Err(err) => log::warn!("failed to serialize state change: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::PromptVariant;

    #[test]
    fn prompt_payload_serializes_for_frontend() {
        let mut state = InterventionState::new();
        state.show_prompt(
            PromptVariant::new("💭", "Lost in thought? I got you!"),
            EmotionLabel::Sad,
        );

        let change = StateChange::from_state(&state);
        let json = serde_json::to_value(&change).unwrap();

        assert_eq!(json["state"], "promptShown");
        assert_eq!(json["payload"]["kind"], "prompt");
        assert_eq!(json["payload"]["heading"], "Lost in thought? I got you!");
        assert_eq!(json["payload"]["detectedEmotion"], "sad");
    }

    #[test]
    fn countdown_payload_carries_formatted_time() {
        let mut state = InterventionState::new();
        state.show_prompt(PromptVariant::new("🐢", "pause"), EmotionLabel::Fear);
        state.begin_break(300);

        let change = StateChange::from_state(&state);
        assert_eq!(
            change.payload,
            StatePayload::Countdown {
                remaining_secs: 300,
                total_secs: 300,
                display: "05:00".into()
            }
        );
    }

    #[test]
    fn channel_emitter_ignores_closed_receiver() {
        let (emitter, rx) = ChannelEmitter::channel();
        drop(rx);
        emitter.emit(&StateChange::from_state(&InterventionState::new()));
    }
}
