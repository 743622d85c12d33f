use serde::Deserialize;

use crate::models::NotificationMessage;

/// Provides the default value for stdout_enabled.
fn default_stdout_enabled() -> bool {
    true
}

/// Configuration for the notification surface.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct NotificationConfig {
    /// The reminder message template. The body may reference the trigger's
    /// `rate_per_minute` and `timestamp_ms` fields.
    #[serde(default)]
    pub message: NotificationMessage,

    /// Whether the stdout notifier is enabled.
    #[serde(default = "default_stdout_enabled")]
    pub stdout_enabled: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { message: NotificationMessage::default(), stdout_enabled: default_stdout_enabled() }
    }
}
