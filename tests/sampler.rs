//! End-to-end tests of the sampling bridge's run loop under a paused tokio
//! runtime, where virtual time fast-forwards deterministically.

use std::{sync::Arc, time::Duration};

use blinkwatch::{
    clock::MonotonicClock,
    engine::{aggregator::BlinkRateAggregator, policy::ReminderPolicy, sampler::RateSampler},
    notify::NotificationService,
    test_helpers::{RecordingNotifier, policy_config},
};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

struct Harness {
    aggregator: Arc<Mutex<BlinkRateAggregator>>,
    notifier: RecordingNotifier,
    token: CancellationToken,
    sampler: RateSampler,
}

fn harness() -> Harness {
    let aggregator = Arc::new(Mutex::new(BlinkRateAggregator::new(Duration::from_secs(180))));
    let notifier = RecordingNotifier::default();
    let notifications =
        Arc::new(NotificationService::new(Default::default(), vec![Box::new(notifier.clone())]));
    let token = CancellationToken::new();
    let sampler = RateSampler::new(
        Arc::clone(&aggregator),
        ReminderPolicy::new(policy_config(9.0, 60_000, 600_000)),
        notifications,
        Duration::from_millis(5_000),
        Arc::new(MonotonicClock::new()),
        token.clone(),
    );
    Harness { aggregator, notifier, token, sampler }
}

#[tokio::test(start_paused = true)]
async fn run_loop_fires_once_during_sustained_silence() {
    let h = harness();
    let handle = tokio::spawn(h.sampler.run());

    // 70 virtual seconds with no blinks: the rate is 0 throughout, the timer
    // starts at the first tick and the reminder fires at the 60 s tick. The
    // cooldown then silences everything else.
    tokio::time::sleep(Duration::from_secs(70)).await;

    h.token.cancel();
    handle.await.unwrap();

    let delivered = h.notifier.delivered().await;
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].1.rate_per_minute, 0.0);
    // Default message template rendered with the trigger's rate.
    assert!(delivered[0].0.body.contains("0.0 blinks/min"));
}

#[tokio::test(start_paused = true)]
async fn run_loop_stays_quiet_while_blinks_flow() {
    let h = harness();
    let aggregator = Arc::clone(&h.aggregator);
    let feeder_token = h.token.clone();

    // Feed a steady 20 blinks/min, stamped off the same virtual timeline.
    let feeder = tokio::spawn(async move {
        let origin = tokio::time::Instant::now();
        loop {
            if feeder_token.is_cancelled() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(3_000)).await;
            let now_ms = origin.elapsed().as_millis() as u64;
            aggregator.lock().await.record(now_ms);
        }
    });
    let handle = tokio::spawn(h.sampler.run());

    tokio::time::sleep(Duration::from_secs(120)).await;

    h.token.cancel();
    handle.await.unwrap();
    feeder.await.unwrap();

    assert!(h.notifier.delivered().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_the_loop_promptly() {
    let h = harness();
    let handle = tokio::spawn(h.sampler.run());

    tokio::time::sleep(Duration::from_secs(10)).await;
    h.token.cancel();
    handle.await.unwrap();

    // Only a few ticks happened before cancellation; nothing fired.
    assert!(h.notifier.delivered().await.is_empty());
}
