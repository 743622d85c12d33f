//! Data model for detector-reported blink events.

use serde::{Deserialize, Serialize};

/// A single blink occurrence reported by the upstream detector.
///
/// Timestamps are milliseconds on the session's monotonic clock and are expected to be
/// non-decreasing across events. The event is owned by the aggregator once recorded and is
/// discarded when it ages out of the rolling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlinkEvent {
    /// When the blink occurred, in milliseconds.
    pub timestamp_ms: u64,
}

impl BlinkEvent {
    /// Creates a blink event at the given timestamp.
    pub fn new(timestamp_ms: u64) -> Self {
        Self { timestamp_ms }
    }
}
