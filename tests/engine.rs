//! Scenario tests driving the aggregator and policy together the way the
//! sampling bridge does: read metrics at a sample time, feed the rate into the
//! policy, collect triggers.

use std::time::Duration;

use blinkwatch::{
    engine::{aggregator::BlinkRateAggregator, policy::ReminderPolicy},
    models::{PolicyState, ReminderTrigger},
    test_helpers::policy_config,
};

const SAMPLING_INTERVAL_MS: u64 = 5_000;

/// Drives one sampling step at `now_ms` and returns the trigger, if any.
fn sample(
    aggregator: &mut BlinkRateAggregator,
    policy: &mut ReminderPolicy,
    now_ms: u64,
) -> Option<ReminderTrigger> {
    let metrics = aggregator.metrics(now_ms);
    policy.evaluate(metrics.rate_per_minute, now_ms).trigger
}

/// Runs the bridge cadence over `[from_ms, to_ms]`, recording fired triggers.
fn run_session(
    aggregator: &mut BlinkRateAggregator,
    policy: &mut ReminderPolicy,
    from_ms: u64,
    to_ms: u64,
) -> Vec<ReminderTrigger> {
    let mut triggers = Vec::new();
    let mut now_ms = from_ms;
    while now_ms <= to_ms {
        triggers.extend(sample(aggregator, policy, now_ms));
        now_ms += SAMPLING_INTERVAL_MS;
    }
    triggers
}

#[test]
fn steady_blinking_never_fires() {
    let mut aggregator = BlinkRateAggregator::new(Duration::from_secs(180));
    let mut policy = ReminderPolicy::new(policy_config(9.0, 60_000, 600_000));

    // One blink every 4 seconds is 15 blinks/min, interleaved with sampling
    // the way the live intake and bridge tasks interleave.
    let mut triggers = Vec::new();
    let mut next_blink = 0;
    for now in (5_000..=600_000).step_by(5_000) {
        while next_blink <= now {
            aggregator.record(next_blink);
            next_blink += 4_000;
        }
        triggers.extend(sample(&mut aggregator, &mut policy, now));
    }
    assert!(triggers.is_empty());
    assert_eq!(policy.state(), PolicyState::Normal);
}

#[test]
fn silence_fires_once_then_cooldown_then_again() {
    // No blinks at all: rate 0 from the first sample. The first reminder
    // fires once the low stretch reaches one minute, the cooldown silences
    // the next ten minutes, and a second reminder follows one minute after
    // the cooldown yields.
    let mut aggregator = BlinkRateAggregator::new(Duration::from_secs(180));
    let mut policy = ReminderPolicy::new(policy_config(9.0, 60_000, 600_000));

    let triggers = run_session(&mut aggregator, &mut policy, 0, 730_000);
    assert_eq!(triggers.len(), 2);

    // Timer started at the first sample (0:00), fired at 1:00.
    assert_eq!(triggers[0].timestamp_ms, 60_000);
    // Cooldown ran to 11:00, the fresh timer started there and fired at 12:00.
    assert_eq!(triggers[1].timestamp_ms, 720_000);
}

#[test]
fn recovery_mid_stretch_restarts_the_timer() {
    // A low stretch, a recovery, then a second low stretch: only the second
    // stretch's timer may fire, a full required-duration after it started.
    let mut aggregator = BlinkRateAggregator::new(Duration::from_secs(180));
    let mut policy = ReminderPolicy::new(policy_config(9.0, 60_000, 600_000));
    let mut triggers = Vec::new();

    // Two early blinks only: the derived rate sinks below 9 by 0:15 and a
    // timer starts accruing.
    aggregator.record(0);
    aggregator.record(1_000);
    for now in (5_000..=25_000).step_by(5_000) {
        triggers.extend(sample(&mut aggregator, &mut policy, now));
    }
    assert_eq!(policy.state(), PolicyState::LowRateDetected { since_ms: 15_000 });

    // A burst of blinks lands just before 0:30: the rate recovers above 9
    // and the accrued timer is discarded.
    for ts in (26_000..=29_500).step_by(500) {
        aggregator.record(ts);
    }
    triggers.extend(sample(&mut aggregator, &mut policy, 30_000));
    assert_eq!(policy.state(), PolicyState::Normal);

    // No further blinks: ten events over a growing span drop below 9
    // blinks/min just after 1:06, restarting the timer at the 1:10 sample.
    for now in (35_000..=170_000).step_by(5_000) {
        triggers.extend(sample(&mut aggregator, &mut policy, now));
    }

    assert_eq!(triggers.len(), 1);
    // The reminder fired one required-duration after the restarted timer,
    // not after the discarded one.
    assert_eq!(triggers[0].timestamp_ms, 130_000);
}

#[test]
fn session_restart_does_not_leak_policy_state() {
    let mut aggregator = BlinkRateAggregator::new(Duration::from_secs(180));
    let mut policy = ReminderPolicy::new(policy_config(9.0, 60_000, 600_000));

    // First session accrues 55 seconds of low-rate timer, then ends.
    let triggers = run_session(&mut aggregator, &mut policy, 0, 55_000);
    assert!(triggers.is_empty());
    assert!(matches!(policy.state(), PolicyState::LowRateDetected { .. }));

    // The bridge resets both components when a new session starts.
    aggregator.reset();
    policy.reset();

    // The new session must wait out the full duration again.
    let triggers = run_session(&mut aggregator, &mut policy, 60_000, 115_000);
    assert!(triggers.is_empty());
    let triggers = run_session(&mut aggregator, &mut policy, 120_000, 120_000);
    assert_eq!(triggers.len(), 1);
}

#[test]
fn single_blink_extrapolation_keeps_rate_high_while_fresh() {
    // A single fresh blink extrapolates to a high rate instead of dividing
    // by the whole window, so one blink right before a sample does not read
    // as "almost zero".
    let mut aggregator = BlinkRateAggregator::new(Duration::from_secs(180));
    aggregator.record(4_000);
    let metrics = aggregator.metrics(5_000);
    assert_eq!(metrics.rate_per_minute, 60.0);

    // The same blink two minutes later has decayed below the threshold.
    let metrics = aggregator.metrics(124_000);
    assert!(metrics.rate_per_minute < 1.0);
}
