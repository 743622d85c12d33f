//! Configuration module for blinkwatch.

mod app_config;
mod helpers;
mod notification;

pub use app_config::AppConfig;
pub use helpers::{
    deserialize_clamped_duration_from_ms, deserialize_duration_from_minutes,
    deserialize_duration_from_ms, deserialize_duration_from_seconds, serialize_duration_to_minutes,
    serialize_duration_to_ms, serialize_duration_to_seconds,
};
pub use notification::NotificationConfig;
