//! # Notification Service
//!
//! This module is responsible for delivering reminder notifications when the
//! policy fires. It renders the configured message template once per trigger
//! and fans the result out to every enabled notifier backend.
//!
//! Rendering failures abort the dispatch (there is nothing to deliver), but a
//! failing backend only logs: one broken channel must not silence the others.

use serde_json::json;

pub mod error;
mod stdout;
pub mod template;
mod traits;

pub use error::NotifierError;
pub use stdout::StdoutNotifier;
#[cfg(test)]
pub use traits::MockNotifier;
pub use traits::Notifier;

use crate::{
    config::NotificationConfig,
    models::{NotificationMessage, ReminderTrigger},
    notify::template::TemplateService,
};

/// A service responsible for rendering and delivering reminder notifications.
pub struct NotificationService {
    /// The message template rendered for each trigger.
    message: NotificationMessage,
    /// The delivery backends, tried in order.
    notifiers: Vec<Box<dyn Notifier>>,
    /// The service for rendering notification templates.
    template_service: TemplateService,
}

impl NotificationService {
    /// Creates a new `NotificationService` with an explicit set of notifiers.
    pub fn new(message: NotificationMessage, notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { message, notifiers, template_service: TemplateService::new() }
    }

    /// Creates a `NotificationService` with the backends enabled in the config.
    pub fn from_config(config: &NotificationConfig) -> Self {
        let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();
        if config.stdout_enabled {
            notifiers.push(Box::new(StdoutNotifier));
        }
        if notifiers.is_empty() {
            tracing::warn!("No notifier backends enabled; reminders will only be logged.");
        }
        Self::new(config.message.clone(), notifiers)
    }

    /// Renders the reminder message for `trigger` and delivers it to every
    /// backend. Per-backend delivery failures are logged and skipped.
    pub async fn dispatch(&self, trigger: &ReminderTrigger) -> Result<(), NotifierError> {
        let context = json!({
            "rate_per_minute": trigger.rate_per_minute,
            "timestamp_ms": trigger.timestamp_ms,
        });
        let rendered = NotificationMessage {
            title: self.template_service.render(&self.message.title, context.clone())?,
            body: self.template_service.render(&self.message.body, context)?,
        };

        tracing::info!(
            rate_per_minute = trigger.rate_per_minute,
            timestamp_ms = trigger.timestamp_ms,
            title = %rendered.title,
            "Dispatching reminder notification."
        );

        for notifier in &self.notifiers {
            if let Err(e) = notifier.notify(&rendered, trigger).await {
                tracing::error!(error = %e, "Notifier failed to deliver reminder.");
            }
        }
        Ok(())
    }
}
