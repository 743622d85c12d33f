use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use super::{
    NotificationConfig, deserialize_duration_from_minutes, deserialize_duration_from_ms,
    deserialize_duration_from_seconds, serialize_duration_to_minutes, serialize_duration_to_ms,
    serialize_duration_to_seconds,
};
use crate::models::PolicyConfig;

/// Provides the default value for window_duration_minutes.
fn default_window_duration() -> Duration {
    Duration::from_secs(3 * 60)
}

/// Provides the default value for sampling_interval_ms.
fn default_sampling_interval() -> Duration {
    Duration::from_millis(5000)
}

/// Provides the default value for shutdown_timeout_secs.
fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Provides the default value for event_channel_capacity.
fn default_event_channel_capacity() -> u32 {
    256
}

/// Application configuration for blinkwatch.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The rolling window over which the blink rate is derived.
    #[serde(
        deserialize_with = "deserialize_duration_from_minutes",
        serialize_with = "serialize_duration_to_minutes",
        default = "default_window_duration"
    )]
    pub window_duration_minutes: Duration,

    /// The interval at which the sampling bridge polls the aggregator and
    /// advances the policy.
    #[serde(
        deserialize_with = "deserialize_duration_from_ms",
        serialize_with = "serialize_duration_to_ms",
        default = "default_sampling_interval"
    )]
    pub sampling_interval_ms: Duration,

    /// The capacity of the channel carrying blink events from the detector.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: u32,

    /// The maximum time in seconds to wait for graceful shutdown.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        serialize_with = "serialize_duration_to_seconds",
        default = "default_shutdown_timeout"
    )]
    pub shutdown_timeout: Duration,

    /// Reminder policy tuning.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Notification surface configuration.
    #[serde(default)]
    pub notification: NotificationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_duration_minutes: default_window_duration(),
            sampling_interval_ms: default_sampling_interval(),
            event_channel_capacity: default_event_channel_capacity(),
            shutdown_timeout: default_shutdown_timeout(),
            policy: PolicyConfig::default(),
            notification: NotificationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Creates a new `AppConfig` by reading from the configuration directory.
    pub fn new(config_dir: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir_str = config_dir.unwrap_or("configs");
        let s = Config::builder()
            .add_source(File::with_name(&format!("{}/app.yaml", config_dir_str)))
            .add_source(Environment::with_prefix("BLINKWATCH").separator("__"))
            .build()?;
        s.try_deserialize()
    }

    /// Creates a new `AppConfigBuilder` for testing purposes.
    #[cfg(test)]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

/// A builder for creating `AppConfig` instances for testing.
#[cfg(test)]
#[derive(Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn window_duration_minutes(mut self, minutes: u64) -> Self {
        self.config.window_duration_minutes = Duration::from_secs(minutes * 60);
        self
    }

    pub fn sampling_interval_ms(mut self, interval_ms: u64) -> Self {
        self.config.sampling_interval_ms = Duration::from_millis(interval_ms);
        self
    }

    pub fn event_channel_capacity(mut self, capacity: u32) -> Self {
        self.config.event_channel_capacity = capacity;
        self
    }

    pub fn policy(mut self, policy: PolicyConfig) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
