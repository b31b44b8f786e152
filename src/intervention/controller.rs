use std::{sync::Arc, time::Duration};

use rand::{rngs::StdRng, SeedableRng};
use tokio::{
    sync::Mutex,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::bridge::{default_prompt_variants, pick_variant, PromptVariant, StateChange, StateEmitter};
use crate::window::DistressVerdict;

use super::{CooldownReason, InterventionState, SchedulerState};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

#[derive(Debug, Clone)]
pub struct InterventionConfig {
    pub auto_dismiss: Duration,
    pub cooldown: Duration,
    pub countdown_tick: Duration,
    /// Break lengths offered to the user
    pub break_durations_secs: Vec<u64>,
}

impl Default for InterventionConfig {
    fn default() -> Self {
        Self {
            auto_dismiss: Duration::from_secs(15),
            cooldown: Duration::from_secs(60),
            countdown_tick: Duration::from_secs(1),
            break_durations_secs: vec![120, 300, 600],
        }
    }
}

/// Holds the single live timer of one kind. Arming a new one cancels the old.
#[derive(Debug, Default)]
struct TimerSlot {
    token: Option<CancellationToken>,
}

impl TimerSlot {
    /// Timers are children of the session token, so cancelling the session
    /// cancels every timer with it.
    fn arm(&mut self, session: &CancellationToken) -> CancellationToken {
        self.cancel();
        let token = session.child_token();
        self.token = Some(token.clone());
        token
    }

    fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }

    #[cfg(test)]
    fn is_live(&self) -> bool {
        self.token.is_some()
    }
}

struct Inner {
    state: InterventionState,
    auto_dismiss: TimerSlot,
    cooldown: TimerSlot,
    countdown: TimerSlot,
    rng: StdRng,
    closed: bool,
}

/// Owns the intervention state and its timers. Verdicts, user actions and
/// timer firings all mutate state through the same mutex, and a timer that
/// lost the race to a user action sees its token cancelled once it holds the
/// lock and backs off.
#[derive(Clone)]
pub struct InterventionController {
    inner: Arc<Mutex<Inner>>,
    emitter: Arc<dyn StateEmitter>,
    config: Arc<InterventionConfig>,
    variants: Arc<Vec<PromptVariant>>,
    session: CancellationToken,
}

impl InterventionController {
    pub fn new(config: InterventionConfig, emitter: Arc<dyn StateEmitter>) -> Self {
        Self::with_rng(config, emitter, StdRng::from_entropy())
    }

    pub fn with_rng(config: InterventionConfig, emitter: Arc<dyn StateEmitter>, rng: StdRng) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: InterventionState::new(),
                auto_dismiss: TimerSlot::default(),
                cooldown: TimerSlot::default(),
                countdown: TimerSlot::default(),
                rng,
                closed: false,
            })),
            emitter,
            config: Arc::new(config),
            variants: Arc::new(default_prompt_variants()),
            session: CancellationToken::new(),
        }
    }

    pub fn with_prompt_variants(mut self, variants: Vec<PromptVariant>) -> Self {
        if !variants.is_empty() {
            self.variants = Arc::new(variants);
        }
        self
    }

    /// Parent of every timer token. Cancelling it tears the controller down
    /// without waiting on the state lock.
    pub fn session_token(&self) -> CancellationToken {
        self.session.clone()
    }

    fn is_closed(&self, inner: &Inner) -> bool {
        inner.closed || self.session.is_cancelled()
    }

    pub fn config(&self) -> &InterventionConfig {
        &self.config
    }

    pub async fn state(&self) -> SchedulerState {
        self.inner.lock().await.state.status
    }

    pub async fn snapshot(&self) -> InterventionState {
        self.inner.lock().await.state.clone()
    }

    /// Opens a prompt for a triggering verdict when idle. Anything else is ignored.
    pub async fn handle_verdict(&self, verdict: DistressVerdict) -> bool {
        if !verdict.trigger {
            return false;
        }

        let mut inner = self.inner.lock().await;
        if self.is_closed(&inner) {
            return false;
        }
        if !inner.state.is_idle() {
            log_debug!(
                "verdict ignored, intervention already active ({:?})",
                inner.state.status
            );
            return false;
        }

        let Some(variant) = pick_variant(&mut inner.rng, &self.variants).cloned() else {
            return false;
        };
        if !inner.state.show_prompt(variant, verdict.display_label) {
            return false;
        }

        let deadline = Instant::now() + self.config.auto_dismiss;
        let token = inner.auto_dismiss.arm(&self.session);
        self.spawn_auto_dismiss(token, deadline);

        log_info!(
            "prompt shown (latest emotion {}, {} distinct in window)",
            verdict.display_label,
            verdict.unique_count
        );
        self.emit(&inner.state);
        true
    }

    pub async fn dismiss(&self) -> bool {
        let mut inner = self.inner.lock().await;
        if self.is_closed(&inner) || !inner.state.dismiss_prompt(CooldownReason::Dismissed) {
            return false;
        }

        inner.auto_dismiss.cancel();
        self.start_cooldown(&mut inner, Instant::now());
        log_info!("prompt dismissed by user");
        self.emit(&inner.state);
        true
    }

    pub async fn start_break(&self, duration_secs: u64) -> bool {
        let mut inner = self.inner.lock().await;
        if self.is_closed(&inner) || !inner.state.begin_break(duration_secs) {
            return false;
        }

        inner.auto_dismiss.cancel();
        let token = inner.countdown.arm(&self.session);
        self.spawn_countdown(token, Instant::now());
        log_info!("break started for {}s", duration_secs);
        self.emit(&inner.state);
        true
    }

    pub async fn cancel_break(&self) -> bool {
        let mut inner = self.inner.lock().await;
        if self.is_closed(&inner) || !inner.state.end_break(CooldownReason::BreakCancelled) {
            return false;
        }

        inner.countdown.cancel();
        self.start_cooldown(&mut inner, Instant::now());
        log_info!("break cancelled by user");
        self.emit(&inner.state);
        true
    }

    /// Cancels every outstanding timer. Later verdicts and actions are ignored.
    pub async fn shutdown(&self) {
        let mut inner = self.inner.lock().await;
        inner.closed = true;
        self.session.cancel();
        inner.auto_dismiss.cancel();
        inner.cooldown.cancel();
        inner.countdown.cancel();
        log_info!("intervention controller shut down in {:?}", inner.state.status);
    }

    #[cfg(test)]
    async fn live_timers(&self) -> (bool, bool, bool) {
        let inner = self.inner.lock().await;
        (
            inner.auto_dismiss.is_live(),
            inner.cooldown.is_live(),
            inner.countdown.is_live(),
        )
    }

    /// Arms the cooldown timer. `entered_at` is when the cycle logically left
    /// its previous state, so a late-running timer task does not stretch it.
    fn start_cooldown(&self, inner: &mut Inner, entered_at: Instant) {
        let token = inner.cooldown.arm(&self.session);
        let deadline = entered_at + self.config.cooldown;
        let this = self.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = time::sleep_until(deadline) => {}
            }

            let mut inner = this.inner.lock().await;
            if token.is_cancelled() {
                return;
            }
            inner.cooldown.cancel();
            if inner.state.finish_cooldown() {
                log_info!("cooldown over, monitoring for new interventions");
                this.emit(&inner.state);
            }
        });
    }

    fn spawn_auto_dismiss(&self, token: CancellationToken, deadline: Instant) {
        let this = self.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = time::sleep_until(deadline) => {}
            }

            let mut inner = this.inner.lock().await;
            if token.is_cancelled() {
                return;
            }
            inner.auto_dismiss.cancel();
            if inner.state.dismiss_prompt(CooldownReason::AutoDismissed) {
                this.start_cooldown(&mut inner, deadline);
                log_info!("prompt auto-dismissed");
                this.emit(&inner.state);
            }
        });
    }

    fn spawn_countdown(&self, token: CancellationToken, started_at: Instant) {
        let this = self.clone();
        // interval panics on a zero period
        let tick = self.config.countdown_tick.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut ticker = time::interval_at(started_at + tick, tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

            loop {
                let at = tokio::select! {
                    _ = token.cancelled() => break,
                    at = ticker.tick() => at,
                };

                let mut inner = this.inner.lock().await;
                if token.is_cancelled() {
                    break;
                }

                let before = inner.state.break_remaining_secs;
                let Some(remaining) = inner.state.tick_break(at - started_at) else {
                    break;
                };

                if remaining == 0 {
                    inner.countdown.cancel();
                    inner.state.end_break(CooldownReason::BreakCompleted);
                    this.start_cooldown(&mut inner, at);
                    log_info!("break finished");
                    this.emit(&inner.state);
                    break;
                }

                if remaining != before {
                    this.emit(&inner.state);
                }
            }
        });
    }

    fn emit(&self, state: &InterventionState) {
        self.emitter.emit(&StateChange::from_state(state));
    }
}
