//! The sampling bridge that polls the aggregator on a fixed cadence and
//! drives the reminder policy.

use std::{sync::Arc, time::Duration};

use tokio::{sync::Mutex, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{
    clock::Clock,
    engine::{aggregator::BlinkRateAggregator, policy::ReminderPolicy},
    notify::NotificationService,
};

/// The periodic driver of a monitoring session.
///
/// Every tick it reads the aggregator's metrics at the injected clock's "now", advances the
/// policy by one sample, and dispatches the trigger payload when one fires. The sampler owns
/// the policy for its whole session, so the policy needs no synchronization; the aggregator is
/// shared with the intake task behind a single mutex.
///
/// The sampler only runs while a session is active: it resets the policy on entry, and
/// cancelling the token is the whole cancellation story since no tick performs blocking work.
pub struct RateSampler {
    /// The shared aggregator, also written by the blink intake task.
    aggregator: Arc<Mutex<BlinkRateAggregator>>,
    /// The hysteresis policy advanced once per tick.
    policy: ReminderPolicy,
    /// The notification surface for fired triggers.
    notifications: Arc<NotificationService>,
    /// The sampling cadence.
    interval: Duration,
    /// The session time source.
    clock: Arc<dyn Clock>,
    /// A token used to signal a graceful shutdown.
    cancellation_token: CancellationToken,
}

impl RateSampler {
    /// Creates a new sampler for one monitoring session.
    pub fn new(
        aggregator: Arc<Mutex<BlinkRateAggregator>>,
        policy: ReminderPolicy,
        notifications: Arc<NotificationService>,
        interval: Duration,
        clock: Arc<dyn Clock>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self { aggregator, policy, notifications, interval, clock, cancellation_token }
    }

    /// Starts the long-running sampling loop.
    pub async fn run(mut self) {
        // A new session must never inherit a previous session's low-rate timer or cooldown.
        self.policy.reset();

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("RateSampler cancellation signal received, shutting down...");
                    break;
                }

                _ = ticker.tick() => {
                    self.sample_once().await;
                }
            }
        }
        tracing::info!("RateSampler has shut down.");
    }

    /// Performs one sampling cycle: read metrics, advance the policy, dispatch.
    async fn sample_once(&mut self) {
        let now_ms = self.clock.now_ms();
        let metrics = self.aggregator.lock().await.metrics(now_ms);
        tracing::debug!(
            rate_per_minute = metrics.rate_per_minute,
            event_count = metrics.event_count,
            now_ms,
            "Sampled blink rate."
        );

        let decision = self.policy.evaluate(metrics.rate_per_minute, now_ms);
        if let Some(trigger) = decision.trigger {
            // Dispatch failures are logged, never fatal: the worst-case failure
            // mode is a missed notification, not a dead monitoring loop.
            if let Err(e) = self.notifications.dispatch(&trigger).await {
                tracing::error!(error = %e, "Failed to dispatch reminder notification.");
            }
        }
    }
}
