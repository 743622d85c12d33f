use thiserror::Error;

use crate::notify::template::TemplateServiceError;

/// Errors that can occur while dispatching notifications.
#[derive(Debug, Error)]
pub enum NotifierError {
    /// The notification template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] TemplateServiceError),

    /// A notifier backend failed to deliver the message.
    #[error("Delivery error: {0}")]
    Delivery(String),
}
