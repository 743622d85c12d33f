use crate::{
    models::{NotificationMessage, ReminderTrigger},
    notify::{error::NotifierError, traits::Notifier},
};

/// A notifier that prints the reminder to standard output.
///
/// Useful on its own for terminal sessions, and as the delivery surface when an
/// external wrapper forwards the process's stdout to a real notification UI.
#[derive(Debug, Default)]
pub struct StdoutNotifier;

#[async_trait::async_trait]
impl Notifier for StdoutNotifier {
    async fn notify(
        &self,
        message: &NotificationMessage,
        trigger: &ReminderTrigger,
    ) -> Result<(), NotifierError> {
        println!(
            "=== Reminder at {} ({:.1} blinks/min) ===\n{}\n{}\n",
            chrono::Utc::now().to_rfc3339(),
            trigger.rate_per_minute,
            message.title,
            message.body
        );
        Ok(())
    }
}
