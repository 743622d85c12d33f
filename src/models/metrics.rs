//! Derived rate metrics reported by the aggregator.

use serde::Serialize;

/// A snapshot of the aggregator's derived metrics at a query time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateMetrics {
    /// The instantaneous blink rate in blinks per minute.
    pub rate_per_minute: f64,
    /// The number of events currently retained in the window.
    pub event_count: usize,
    /// The configured window duration in milliseconds.
    pub window_duration_ms: u64,
}
