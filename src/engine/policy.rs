//! The hysteresis policy that turns a noisy rate stream into a debounced,
//! cooldown-limited trigger signal.

use crate::models::{PolicyConfig, PolicyConfigUpdate, PolicyState, ReminderTrigger};

/// The outcome of evaluating one rate sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyDecision {
    /// Whether a reminder should fire for this sample.
    pub triggered: bool,
    /// The trigger payload, present exactly when `triggered` is true.
    pub trigger: Option<ReminderTrigger>,
}

impl PolicyDecision {
    /// A decision that fires no reminder.
    fn quiet() -> Self {
        Self { triggered: false, trigger: None }
    }

    /// A decision that fires a reminder with the given payload.
    fn fire(trigger: ReminderTrigger) -> Self {
        Self { triggered: true, trigger: Some(trigger) }
    }
}

/// A state machine consuming periodic `(rate, timestamp)` samples and emitting a debounced
/// trigger when the rate has been below the threshold for a sustained duration, subject to a
/// cooldown.
///
/// The policy has no fallible operations: invalid config values are clamped at the config
/// boundary, and evaluation is total over its inputs. The engine runs on a best-effort
/// monitoring path where failing hard would silence all future alerting.
#[derive(Debug)]
pub struct ReminderPolicy {
    config: PolicyConfig,
    state: PolicyState,
}

impl ReminderPolicy {
    /// Creates a policy in the `Normal` state with the given (clamped) config.
    pub fn new(config: PolicyConfig) -> Self {
        Self { config: config.clamped(), state: PolicyState::Normal }
    }

    /// Advances the state machine by one sample and reports whether a reminder
    /// should fire for it.
    pub fn evaluate(&mut self, rate_per_minute: f64, now_ms: u64) -> PolicyDecision {
        // Cooldown expiry is checked before the rate comparison, so the state yields to
        // Normal deterministically once the deadline passes even without a sample exactly
        // at the boundary. The same sample is then re-evaluated under the Normal rule.
        if let PolicyState::Cooldown { until_ms } = self.state {
            if now_ms >= until_ms {
                tracing::debug!(now_ms, until_ms, "Cooldown expired.");
                self.state = PolicyState::Normal;
            } else {
                return PolicyDecision::quiet();
            }
        }

        // A rate exactly equal to the threshold counts as not-low.
        let low = rate_per_minute < self.config.threshold_bpm;

        match self.state {
            PolicyState::Normal => {
                if low {
                    tracing::debug!(rate_per_minute, now_ms, "Low blink rate, timer started.");
                    self.state = PolicyState::LowRateDetected { since_ms: now_ms };
                }
                PolicyDecision::quiet()
            }
            PolicyState::LowRateDetected { since_ms } => {
                if !low {
                    tracing::debug!(rate_per_minute, now_ms, "Rate recovered, timer discarded.");
                    self.state = PolicyState::Normal;
                    return PolicyDecision::quiet();
                }
                let required_ms = self.config.required_duration_ms.as_millis() as u64;
                if now_ms.saturating_sub(since_ms) >= required_ms {
                    let until_ms = now_ms + self.config.cooldown_ms.as_millis() as u64;
                    self.state = PolicyState::Cooldown { until_ms };
                    tracing::info!(
                        rate_per_minute,
                        now_ms,
                        cooldown_until_ms = until_ms,
                        "Low rate sustained, firing reminder trigger."
                    );
                    PolicyDecision::fire(ReminderTrigger { rate_per_minute, timestamp_ms: now_ms })
                } else {
                    // The timer keeps its original start; repeated low samples never reset it.
                    PolicyDecision::quiet()
                }
            }
            // An unexpired cooldown already returned above.
            PolicyState::Cooldown { .. } => PolicyDecision::quiet(),
        }
    }

    /// Returns to `Normal`, discarding any in-flight low-rate timer or active cooldown.
    ///
    /// Called at session start so a prior session's state never leaks into a new one.
    pub fn reset(&mut self) {
        self.state = PolicyState::Normal;
    }

    /// Merges new threshold/cooldown/duration values without altering the
    /// current state; the next evaluation uses the new config.
    pub fn update_config(&mut self, update: PolicyConfigUpdate) {
        self.config.apply(update);
        tracing::debug!(config = ?self.config, "Policy config updated.");
    }

    /// Read-only snapshot of the current state, for diagnostics and tests.
    pub fn state(&self) -> PolicyState {
        self.state
    }

    /// The currently active config.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }
}
