//! Configuration and state models for the reminder policy.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::{deserialize_clamped_duration_from_ms, serialize_duration_to_ms};

/// Provides the default value for threshold_bpm.
fn default_threshold_bpm() -> f64 {
    9.0
}

/// Provides the default value for required_duration_ms.
fn default_required_duration() -> Duration {
    Duration::from_millis(60_000)
}

/// Provides the default value for cooldown_ms.
fn default_cooldown() -> Duration {
    Duration::from_millis(600_000)
}

/// Clamps a configured threshold to a usable value.
///
/// Negative or non-finite thresholds become zero, which degrades toward never starting a
/// low-rate timer rather than crashing the monitoring path.
fn clamp_bpm(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Custom deserializer for the blink-rate threshold, clamping invalid input.
fn deserialize_clamped_bpm<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(clamp_bpm(value))
}

/// Tuning parameters for the hysteresis reminder policy.
///
/// An immutable snapshot; the policy replaces it wholesale when a partial update is applied.
/// Out-of-range values are clamped at this boundary rather than rejected, so a misconfigured
/// policy degrades toward firing too eagerly, never toward silently never firing.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PolicyConfig {
    /// The blink rate below which a reminder timer starts, in blinks per minute.
    ///
    /// A rate exactly equal to the threshold counts as normal.
    #[serde(default = "default_threshold_bpm", deserialize_with = "deserialize_clamped_bpm")]
    pub threshold_bpm: f64,

    /// How long the rate must stay below the threshold before a reminder fires.
    #[serde(
        deserialize_with = "deserialize_clamped_duration_from_ms",
        serialize_with = "serialize_duration_to_ms",
        default = "default_required_duration"
    )]
    pub required_duration_ms: Duration,

    /// The minimum interval between two reminders.
    #[serde(
        deserialize_with = "deserialize_clamped_duration_from_ms",
        serialize_with = "serialize_duration_to_ms",
        default = "default_cooldown"
    )]
    pub cooldown_ms: Duration,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            threshold_bpm: default_threshold_bpm(),
            required_duration_ms: default_required_duration(),
            cooldown_ms: default_cooldown(),
        }
    }
}

impl PolicyConfig {
    /// Returns a copy with out-of-range values clamped to safe ones.
    ///
    /// Serde deserialization already clamps; this covers configs built in code.
    pub fn clamped(mut self) -> Self {
        self.threshold_bpm = clamp_bpm(self.threshold_bpm);
        self
    }

    /// Merges a partial update into this config, clamping as at the serde boundary.
    pub fn apply(&mut self, update: PolicyConfigUpdate) {
        if let Some(threshold_bpm) = update.threshold_bpm {
            self.threshold_bpm = clamp_bpm(threshold_bpm);
        }
        if let Some(required_duration_ms) = update.required_duration_ms {
            self.required_duration_ms = required_duration_ms;
        }
        if let Some(cooldown_ms) = update.cooldown_ms {
            self.cooldown_ms = cooldown_ms;
        }
    }
}

/// A partial overlay for [`PolicyConfig`]; unset fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PolicyConfigUpdate {
    /// New blink-rate threshold, in blinks per minute.
    pub threshold_bpm: Option<f64>,
    /// New required low-rate duration.
    pub required_duration_ms: Option<Duration>,
    /// New cooldown interval.
    pub cooldown_ms: Option<Duration>,
}

/// The hysteresis state machine's current position.
///
/// Exactly one variant is active at a time; modeling the states as a tagged enum makes invalid
/// flag combinations unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PolicyState {
    /// The rate is at or above the threshold.
    Normal,
    /// The rate has been below the threshold since `since_ms`.
    LowRateDetected {
        /// When the current low-rate run started, in milliseconds.
        since_ms: u64,
    },
    /// A reminder fired; no further reminders until `until_ms`.
    Cooldown {
        /// When the cooldown expires, in milliseconds.
        until_ms: u64,
    },
}
