//! A set of helpers for testing

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::sync::Mutex;

use crate::{
    clock::Clock,
    models::{NotificationMessage, PolicyConfig, ReminderTrigger},
    notify::{Notifier, NotifierError},
};

/// A manually driven clock for scripted tests.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock reading `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self { now_ms: Arc::new(AtomicU64::new(start_ms)) }
    }

    /// Moves the clock to an absolute time.
    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    /// Advances the clock by a relative amount.
    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// A notifier that records every delivered reminder for later assertions.
///
/// Clones share the same underlying log, so a clone can be handed to a
/// `NotificationService` while the test keeps the original for inspection.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    delivered: Arc<Mutex<Vec<(NotificationMessage, ReminderTrigger)>>>,
}

impl RecordingNotifier {
    /// Returns a copy of everything delivered so far.
    pub async fn delivered(&self) -> Vec<(NotificationMessage, ReminderTrigger)> {
        self.delivered.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        message: &NotificationMessage,
        trigger: &ReminderTrigger,
    ) -> Result<(), NotifierError> {
        self.delivered.lock().await.push((message.clone(), *trigger));
        Ok(())
    }
}

/// Builds a `PolicyConfig` with explicit millisecond durations.
pub fn policy_config(
    threshold_bpm: f64,
    required_duration_ms: u64,
    cooldown_ms: u64,
) -> PolicyConfig {
    PolicyConfig {
        threshold_bpm,
        required_duration_ms: Duration::from_millis(required_duration_ms),
        cooldown_ms: Duration::from_millis(cooldown_ms),
    }
}
