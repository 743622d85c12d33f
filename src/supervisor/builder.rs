//! This module provides the `SupervisorBuilder` for constructing a `Supervisor`.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::{Supervisor, SupervisorError};
use crate::{
    clock::{Clock, MonotonicClock},
    config::AppConfig,
    detector::BlinkSource,
    engine::{aggregator::BlinkRateAggregator, policy::ReminderPolicy, sampler::RateSampler},
    notify::{NotificationService, Notifier},
};

/// A builder for creating a `Supervisor` instance.
#[derive(Default)]
pub struct SupervisorBuilder {
    config: Option<AppConfig>,
    source: Option<Arc<dyn BlinkSource>>,
    clock: Option<Arc<dyn Clock>>,
    notifiers: Option<Vec<Box<dyn Notifier>>>,
}

impl SupervisorBuilder {
    /// Creates a new, empty `SupervisorBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the application configuration for the `Supervisor`.
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the blink source for the `Supervisor`.
    pub fn source(mut self, source: Arc<dyn BlinkSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the session time source. Defaults to a `MonotonicClock`.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Overrides the notifier backends derived from the configuration.
    pub fn notifiers(mut self, notifiers: Vec<Box<dyn Notifier>>) -> Self {
        self.notifiers = Some(notifiers);
        self
    }

    /// Assembles and validates the components to build a `Supervisor`.
    ///
    /// This method performs the final "wiring" of the session's services: the
    /// shared aggregator, the reminder policy, the notification service, and
    /// the sampling bridge that connects them.
    pub fn build(self) -> Result<Supervisor, SupervisorError> {
        let config = self.config.ok_or(SupervisorError::MissingConfig)?;
        let source = self.source.ok_or(SupervisorError::MissingBlinkSource)?;

        if config.sampling_interval_ms.is_zero() {
            return Err(SupervisorError::InvalidConfiguration(
                "sampling_interval_ms must be positive".to_string(),
            ));
        }
        if config.window_duration_minutes.is_zero() {
            return Err(SupervisorError::InvalidConfiguration(
                "window_duration_minutes must be positive".to_string(),
            ));
        }

        let clock = self.clock.unwrap_or_else(|| Arc::new(MonotonicClock::new()));
        let cancellation_token = CancellationToken::new();

        let aggregator =
            Arc::new(Mutex::new(BlinkRateAggregator::new(config.window_duration_minutes)));
        let policy = ReminderPolicy::new(config.policy.clone());
        let notifications = Arc::new(match self.notifiers {
            Some(notifiers) => {
                NotificationService::new(config.notification.message.clone(), notifiers)
            }
            None => NotificationService::from_config(&config.notification),
        });

        tracing::debug!(
            window = ?config.window_duration_minutes,
            sampling_interval = ?config.sampling_interval_ms,
            threshold_bpm = config.policy.threshold_bpm,
            "Wiring monitoring session."
        );

        let sampler = RateSampler::new(
            Arc::clone(&aggregator),
            policy,
            notifications,
            config.sampling_interval_ms,
            Arc::clone(&clock),
            cancellation_token.clone(),
        );

        Ok(Supervisor::new(config, aggregator, source, sampler, clock, cancellation_token))
    }
}
