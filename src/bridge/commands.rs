use serde::{Deserialize, Serialize};

use crate::intervention::{InterventionController, InterventionState};

use super::events::StateChange;

/// User gestures relayed from the presentation layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum UserAction {
    Dismiss,
    #[serde(rename_all = "camelCase")]
    StartBreak {
        duration_secs: u64,
    },
    CancelBreak,
}

/// Thin seam between a UI and the intervention controller: relays actions in,
/// exposes the current state out. Holds no state of its own.
#[derive(Clone)]
pub struct PresentationBridge {
    controller: InterventionController,
}

impl PresentationBridge {
    pub fn new(controller: InterventionController) -> Self {
        Self { controller }
    }

    /// Delivers one gesture. Returns whether it caused a transition; gestures
    /// that do not apply to the current state are dropped.
    pub async fn dispatch(&self, action: UserAction) -> bool {
        match action {
            UserAction::Dismiss => self.controller.dismiss().await,
            UserAction::StartBreak { duration_secs } => {
                self.controller.start_break(duration_secs).await
            }
            UserAction::CancelBreak => self.controller.cancel_break().await,
        }
    }

    /// Accepts an action serialized by a web frontend, e.g.
    /// `{"action":"startBreak","durationSecs":300}`.
    pub async fn dispatch_json(&self, raw: &str) -> Result<bool, String> {
        let action: UserAction = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        Ok(self.dispatch(action).await)
    }

    pub async fn current(&self) -> StateChange {
        StateChange::from_state(&self.controller.snapshot().await)
    }

    pub async fn snapshot(&self) -> InterventionState {
        self.controller.snapshot().await
    }

    pub fn break_choices(&self) -> &[u64] {
        &self.controller.config().break_durations_secs
    }
}
