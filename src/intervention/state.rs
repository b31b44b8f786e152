use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::bridge::PromptVariant;
use crate::models::EmotionLabel;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SchedulerState {
    #[default]
    Idle,
    PromptShown,
    Cooldown,
    BreakRunning,
}

/// Why the last intervention cycle moved into cooldown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CooldownReason {
    AutoDismissed,
    Dismissed,
    BreakCompleted,
    BreakCancelled,
}

/// Intervention state machine. Every transition returns whether it applied;
/// a call that is not valid in the current state changes nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionState {
    pub status: SchedulerState,
    pub prompt: Option<PromptVariant>,
    /// Latest emotion of the window that opened the current prompt
    pub trigger_emotion: Option<EmotionLabel>,
    pub break_total_secs: u64,
    pub break_remaining_secs: u64,
    pub last_reason: Option<CooldownReason>,
    /// Prompts shown since the session started
    pub interventions: u64,
}

impl InterventionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.status == SchedulerState::Idle
    }

    /// Idle -> PromptShown
    pub fn show_prompt(&mut self, variant: PromptVariant, emotion: EmotionLabel) -> bool {
        if self.status != SchedulerState::Idle {
            return false;
        }
        self.status = SchedulerState::PromptShown;
        self.prompt = Some(variant);
        self.trigger_emotion = Some(emotion);
        self.last_reason = None;
        self.interventions += 1;
        true
    }

    /// PromptShown -> Cooldown, either by the user or by the auto-dismiss deadline.
    pub fn dismiss_prompt(&mut self, reason: CooldownReason) -> bool {
        if self.status != SchedulerState::PromptShown {
            return false;
        }
        self.status = SchedulerState::Cooldown;
        self.prompt = None;
        self.last_reason = Some(reason);
        true
    }

    /// PromptShown -> BreakRunning. A zero-length break is rejected.
    pub fn begin_break(&mut self, duration_secs: u64) -> bool {
        if self.status != SchedulerState::PromptShown || duration_secs == 0 {
            return false;
        }
        self.status = SchedulerState::BreakRunning;
        self.prompt = None;
        self.break_total_secs = duration_secs;
        self.break_remaining_secs = duration_secs;
        true
    }

    /// Recomputes the remaining break time from the time elapsed since the
    /// break began. Returns the new remaining seconds, or `None` when no break
    /// is running.
    pub fn tick_break(&mut self, elapsed: Duration) -> Option<u64> {
        if self.status != SchedulerState::BreakRunning {
            return None;
        }
        self.break_remaining_secs = self.break_total_secs.saturating_sub(elapsed.as_secs());
        Some(self.break_remaining_secs)
    }

    /// BreakRunning -> Cooldown, on countdown completion or user cancel.
    pub fn end_break(&mut self, reason: CooldownReason) -> bool {
        if self.status != SchedulerState::BreakRunning {
            return false;
        }
        self.status = SchedulerState::Cooldown;
        self.break_remaining_secs = 0;
        self.last_reason = Some(reason);
        true
    }

    /// Cooldown -> Idle
    pub fn finish_cooldown(&mut self) -> bool {
        if self.status != SchedulerState::Cooldown {
            return false;
        }
        self.status = SchedulerState::Idle;
        self.trigger_emotion = None;
        self.break_total_secs = 0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant() -> PromptVariant {
        PromptVariant::new("🧠", "You seem tense or distracted!")
    }

    fn prompted() -> InterventionState {
        let mut state = InterventionState::new();
        assert!(state.show_prompt(variant(), EmotionLabel::Angry));
        state
    }

    #[test]
    fn starts_idle() {
        assert_eq!(InterventionState::new().status, SchedulerState::Idle);
    }

    #[test]
    fn prompt_only_opens_from_idle() {
        let mut state = prompted();
        assert!(!state.show_prompt(variant(), EmotionLabel::Sad));
        assert_eq!(state.trigger_emotion, Some(EmotionLabel::Angry));

        state.dismiss_prompt(CooldownReason::Dismissed);
        assert!(!state.show_prompt(variant(), EmotionLabel::Sad));
        assert_eq!(state.status, SchedulerState::Cooldown);
        assert_eq!(state.interventions, 1);
    }

    #[test]
    fn second_dismiss_is_a_noop() {
        let mut state = prompted();
        assert!(state.dismiss_prompt(CooldownReason::Dismissed));
        assert!(!state.dismiss_prompt(CooldownReason::Dismissed));
        assert_eq!(state.status, SchedulerState::Cooldown);
        assert_eq!(state.last_reason, Some(CooldownReason::Dismissed));
    }

    #[test]
    fn break_requires_open_prompt() {
        let mut idle = InterventionState::new();
        assert!(!idle.begin_break(300));
        assert_eq!(idle.status, SchedulerState::Idle);

        let mut cooling = prompted();
        cooling.dismiss_prompt(CooldownReason::AutoDismissed);
        assert!(!cooling.begin_break(300));
        assert_eq!(cooling.status, SchedulerState::Cooldown);
    }

    #[test]
    fn zero_length_break_is_rejected() {
        let mut state = prompted();
        assert!(!state.begin_break(0));
        assert_eq!(state.status, SchedulerState::PromptShown);
    }

    #[test]
    fn break_counts_down_from_elapsed_time() {
        let mut state = prompted();
        assert!(state.begin_break(120));
        assert_eq!(state.prompt, None);
        assert_eq!(state.tick_break(Duration::from_millis(1_500)), Some(119));
        assert_eq!(state.tick_break(Duration::from_secs(200)), Some(0));
    }

    #[test]
    fn cancelled_break_goes_to_cooldown_not_idle() {
        let mut state = prompted();
        state.begin_break(300);
        state.tick_break(Duration::from_secs(100));

        assert!(state.end_break(CooldownReason::BreakCancelled));
        assert_eq!(state.status, SchedulerState::Cooldown);
        assert_eq!(state.break_remaining_secs, 0);
        assert_eq!(state.tick_break(Duration::from_secs(101)), None);
    }

    #[test]
    fn cooldown_returns_to_idle_once() {
        let mut state = prompted();
        state.dismiss_prompt(CooldownReason::AutoDismissed);
        assert!(state.finish_cooldown());
        assert!(state.is_idle());
        assert!(!state.finish_cooldown());
        assert_eq!(state.last_reason, Some(CooldownReason::AutoDismissed));
    }

    #[test]
    fn end_break_outside_break_is_a_noop() {
        let mut state = prompted();
        assert!(!state.end_break(CooldownReason::BreakCancelled));
        assert_eq!(state.status, SchedulerState::PromptShown);
    }
}
