//! Rolling-window aggregation of blink events into a blinks-per-minute rate.

use std::{collections::VecDeque, time::Duration};

use crate::models::RateMetrics;

/// Milliseconds per minute, the rate conversion factor.
const MS_PER_MINUTE: f64 = 60_000.0;

/// Maintains a time-bounded log of blink timestamps and derives an instantaneous
/// blinks-per-minute rate from it.
///
/// Events are expected in non-decreasing timestamp order. Out-of-order input is accepted
/// silently; metrics may transiently misreport until the next in-order event restores the
/// window. Purging is lazy: both [`record`](Self::record) and [`metrics`](Self::metrics) drop
/// events older than the window relative to the call's timestamp, so stale events never linger
/// even when no new blinks arrive.
#[derive(Debug)]
pub struct BlinkRateAggregator {
    /// Retained event timestamps, oldest first.
    events: VecDeque<u64>,
    /// The rolling window duration in milliseconds.
    window_ms: u64,
}

impl BlinkRateAggregator {
    /// Creates an empty aggregator with the given rolling window.
    pub fn new(window: Duration) -> Self {
        Self { events: VecDeque::new(), window_ms: window.as_millis() as u64 }
    }

    /// Records one blink occurrence, then purges events that have aged out of
    /// the window relative to this call's timestamp.
    pub fn record(&mut self, timestamp_ms: u64) {
        self.events.push_back(timestamp_ms);
        self.purge(timestamp_ms);
        tracing::trace!(timestamp_ms, retained = self.events.len(), "Blink recorded.");
    }

    /// Returns the derived metrics as of `now_ms`, purging stale events first.
    ///
    /// Rate derivation, in priority order:
    /// 1. No retained events: the rate is zero.
    /// 2. One retained event: extrapolate from its age (`60000 / age`) instead of dividing by
    ///    the full window, which would under-report a fresh sample.
    /// 3. Two or more events: `count / span * 60000` over the actual observed span, so the rate
    ///    is accurate before the window has fully populated.
    pub fn metrics(&mut self, now_ms: u64) -> RateMetrics {
        self.purge(now_ms);

        let rate_per_minute = match self.events.len() {
            0 => 0.0,
            1 => {
                // A zero age is counted as one millisecond to keep the division total.
                let age_ms = now_ms.saturating_sub(self.events[0]).max(1);
                MS_PER_MINUTE / age_ms as f64
            }
            count => {
                let oldest = self.events[0];
                let span_ms = now_ms.saturating_sub(oldest).max(1);
                count as f64 * MS_PER_MINUTE / span_ms as f64
            }
        };

        RateMetrics {
            rate_per_minute,
            event_count: self.events.len(),
            window_duration_ms: self.window_ms,
        }
    }

    /// Clears all retained events; metrics immediately report zero.
    pub fn reset(&mut self) {
        self.events.clear();
        tracing::debug!("Aggregator reset, event log cleared.");
    }

    /// Removes events whose age relative to `now_ms` exceeds the window.
    ///
    /// An event exactly at the window boundary (age == window) is retained.
    fn purge(&mut self, now_ms: u64) {
        let cutoff = now_ms.saturating_sub(self.window_ms);
        while let Some(&oldest) = self.events.front() {
            if oldest < cutoff {
                self.events.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(180_000);

    #[test]
    fn zero_event_baseline() {
        let mut aggregator = BlinkRateAggregator::new(WINDOW);
        let metrics = aggregator.metrics(123_456);
        assert_eq!(metrics.rate_per_minute, 0.0);
        assert_eq!(metrics.event_count, 0);
        assert_eq!(metrics.window_duration_ms, 180_000);
    }

    #[test]
    fn single_event_extrapolates_from_age() {
        let mut aggregator = BlinkRateAggregator::new(WINDOW);
        aggregator.record(10_000);
        // One event, one second old: 60000 / 1000 = 60 blinks/min.
        let metrics = aggregator.metrics(11_000);
        assert_eq!(metrics.rate_per_minute, 60.0);
        assert_eq!(metrics.event_count, 1);
    }

    #[test]
    fn single_stale_event_is_purged_at_read_time() {
        let mut aggregator = BlinkRateAggregator::new(WINDOW);
        aggregator.record(0);
        let metrics = aggregator.metrics(180_001);
        assert_eq!(metrics.rate_per_minute, 0.0);
        assert_eq!(metrics.event_count, 0);
    }

    #[test]
    fn event_exactly_at_window_boundary_is_retained() {
        let mut aggregator = BlinkRateAggregator::new(WINDOW);
        aggregator.record(0);
        let metrics = aggregator.metrics(180_000);
        assert_eq!(metrics.event_count, 1);
    }

    #[test]
    fn multi_event_rate_uses_observed_span() {
        let mut aggregator = BlinkRateAggregator::new(WINDOW);
        aggregator.record(0);
        aggregator.record(10_000);
        aggregator.record(20_000);
        // Three events over 30 seconds: 3 / 30000 * 60000 = 6 blinks/min.
        let metrics = aggregator.metrics(30_000);
        assert_eq!(metrics.rate_per_minute, 6.0);
        assert_eq!(metrics.event_count, 3);
    }

    #[test]
    fn rate_is_accurate_before_window_fills() {
        let mut aggregator = BlinkRateAggregator::new(WINDOW);
        // Ten blinks in the first 27 seconds of a 3-minute window.
        for i in 0..10 {
            aggregator.record(i * 3000);
        }
        // Ten events over 30 seconds: 20 blinks/min, not the ~3.3 a full-window
        // denominator would report.
        let metrics = aggregator.metrics(30_000);
        assert_eq!(metrics.event_count, 10);
        assert_eq!(metrics.rate_per_minute, 20.0);
    }

    #[test]
    fn window_invariant_holds_across_adds_and_reads() {
        let mut aggregator = BlinkRateAggregator::new(Duration::from_millis(10_000));
        let timestamps = [0u64, 2_000, 4_000, 9_000, 12_000, 15_000];
        for &ts in &timestamps {
            aggregator.record(ts);
        }
        for &now in &[15_000u64, 18_000, 25_000, 40_000] {
            let expected =
                timestamps.iter().filter(|&&ts| ts <= now && now - ts <= 10_000).count();
            assert_eq!(aggregator.metrics(now).event_count, expected, "at t={now}");
        }
    }

    #[test]
    fn record_purges_relative_to_its_own_timestamp() {
        let mut aggregator = BlinkRateAggregator::new(Duration::from_millis(10_000));
        aggregator.record(0);
        aggregator.record(5_000);
        // This event pushes the first one out of the window immediately.
        aggregator.record(11_000);
        assert_eq!(aggregator.metrics(11_000).event_count, 2);
    }

    #[test]
    fn out_of_order_input_is_accepted() {
        let mut aggregator = BlinkRateAggregator::new(WINDOW);
        aggregator.record(20_000);
        aggregator.record(10_000);
        // Both events are retained; the window self-corrects on later input.
        assert_eq!(aggregator.metrics(20_000).event_count, 2);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut aggregator = BlinkRateAggregator::new(WINDOW);
        aggregator.record(1_000);
        aggregator.record(2_000);
        aggregator.reset();
        aggregator.reset();
        let metrics = aggregator.metrics(3_000);
        assert_eq!(metrics.rate_per_minute, 0.0);
        assert_eq!(metrics.event_count, 0);
    }

    #[test]
    fn behaves_like_fresh_instance_after_reset() {
        let mut aggregator = BlinkRateAggregator::new(WINDOW);
        for i in 0..20 {
            aggregator.record(i * 500);
        }
        aggregator.reset();
        aggregator.record(100_000);
        let mut fresh = BlinkRateAggregator::new(WINDOW);
        fresh.record(100_000);
        assert_eq!(aggregator.metrics(101_000), fresh.metrics(101_000));
    }
}
