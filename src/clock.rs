//! Injected time sources for the monitoring engine.
//!
//! Engine components never sample the wall clock themselves; every operation takes or derives
//! caller-supplied timestamps, which keeps transitions deterministic under test. The supervisor
//! injects one `Clock` per monitoring session and all tasks share it.

/// A monotonic source of "now" in milliseconds.
pub trait Clock: Send + Sync {
    /// Returns the current time in milliseconds.
    ///
    /// Successive calls on the same clock instance are non-decreasing.
    fn now_ms(&self) -> u64;
}

/// A `Clock` backed by the tokio runtime clock.
///
/// Reports milliseconds elapsed since the clock was created. Under a paused tokio runtime this
/// follows virtual time, so timer-driven tests fast-forward instead of sleeping.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: tokio::time::Instant,
}

impl MonotonicClock {
    /// Creates a clock anchored at the current instant.
    pub fn new() -> Self {
        Self { origin: tokio::time::Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn monotonic_clock_is_non_decreasing() {
        let clock = MonotonicClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }

    #[tokio::test(start_paused = true)]
    async fn monotonic_clock_follows_virtual_time() {
        let clock = MonotonicClock::new();
        let before = clock.now_ms();
        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        assert_eq!(clock.now_ms() - before, 1500);
    }
}
