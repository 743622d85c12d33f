//! Data models for reminder triggers and notification messages.

use serde::{Deserialize, Serialize};

/// The payload handed to notifiers when the policy fires.
///
/// Emitted at most once per cooldown entry and not retained by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReminderTrigger {
    /// The blink rate that satisfied the low-rate condition.
    pub rate_per_minute: f64,
    /// The sample timestamp at which the reminder fired, in milliseconds.
    pub timestamp_ms: u64,
}

/// A message to be sent in a notification, with a title and body.
///
/// Both fields are templates rendered with the trigger's fields
/// (`rate_per_minute`, `timestamp_ms`) in scope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationMessage {
    /// The title of the notification message.
    pub title: String,
    /// The body content of the notification message.
    pub body: String,
}

impl Default for NotificationMessage {
    fn default() -> Self {
        Self {
            title: "Time to rest your eyes".to_string(),
            body: "Your blink rate dropped to {{ rate_per_minute | round(1) }} blinks/min. \
                   Look away from the screen for a moment."
                .to_string(),
        }
    }
}
