//! This module contains the data models for the blinkwatch application.

pub mod blink;
pub mod metrics;
pub mod policy;
pub mod trigger;

pub use blink::BlinkEvent;
pub use metrics::RateMetrics;
pub use policy::{PolicyConfig, PolicyConfigUpdate, PolicyState};
pub use trigger::{NotificationMessage, ReminderTrigger};
