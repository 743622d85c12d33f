use crate::{
    models::{NotificationMessage, ReminderTrigger},
    notify::error::NotifierError,
};

/// A trait representing a delivery channel for reminder notifications.
///
/// Implementations receive the already-rendered message along with the raw trigger payload;
/// how the reminder is ultimately presented (desktop toast, sound, log line) is outside the
/// engine's scope.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one rendered reminder.
    async fn notify(
        &self,
        message: &NotificationMessage,
        trigger: &ReminderTrigger,
    ) -> Result<(), NotifierError>;
}
