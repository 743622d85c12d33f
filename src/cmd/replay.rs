//! Offline replay of a recorded blink log through the monitoring engine.
//!
//! Reads a file holding one millisecond timestamp per line, drives a fresh
//! aggregator and policy at the configured sampling cadence, and reports the
//! reminders that would have fired. Useful for tuning thresholds against real
//! recordings without a live detector.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::{
    config::AppConfig,
    engine::{aggregator::BlinkRateAggregator, policy::ReminderPolicy},
    models::ReminderTrigger,
};

/// Errors that can occur during a replay run.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading the blink log.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while loading the application configuration.
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    /// A line in the blink log did not hold a millisecond timestamp.
    #[error("Invalid timestamp on line {line}: {value:?}")]
    InvalidTimestamp {
        /// The 1-based line number.
        line: usize,
        /// The offending line content.
        value: String,
    },

    /// JSON serialization error while writing the report.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Arguments for the replay command.
#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// Path to a recorded blink log, one millisecond timestamp per line.
    #[arg(short, long)]
    input: PathBuf,

    /// Session length in milliseconds. A recording only holds blinks, so a
    /// trailing silent stretch is invisible without this; defaults to the last
    /// recorded timestamp.
    #[arg(short, long)]
    duration_ms: Option<u64>,

    /// Path to the configuration directory. Defaults to `configs`.
    #[arg(short, long)]
    config_dir: Option<String>,
}

/// Executes the replay command.
pub async fn execute(args: ReplayArgs) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialization
    let config = AppConfig::new(args.config_dir.as_deref())?;

    // 2. Blink log loading
    let raw = tokio::fs::read_to_string(&args.input).await.map_err(Error::Io)?;
    let timestamps = parse_blink_log(&raw)?;
    tracing::info!(events = timestamps.len(), input = %args.input.display(), "Blink log loaded.");

    // 3. Core loop
    let session_end_ms =
        args.duration_ms.unwrap_or_else(|| timestamps.last().copied().unwrap_or(0));
    let triggers = replay_log(&timestamps, session_end_ms, &config);
    tracing::info!(triggers = triggers.len(), "Replay finished.");

    // 4. Reporting
    let report = serde_json::to_string_pretty(&triggers).map_err(Error::Json)?;
    println!("{}", report);

    Ok(())
}

/// Parses a blink log: one millisecond timestamp per line, blank lines and
/// `#` comments skipped.
fn parse_blink_log(raw: &str) -> Result<Vec<u64>, Error> {
    let mut timestamps = Vec::new();
    for (index, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let timestamp = line.parse::<u64>().map_err(|_| Error::InvalidTimestamp {
            line: index + 1,
            value: line.to_string(),
        })?;
        timestamps.push(timestamp);
    }
    Ok(timestamps)
}

/// Drives the engine over a recorded log at the configured sampling cadence.
///
/// Events are fed in file order; samples are taken every `sampling_interval_ms`
/// from the session start through `session_end_ms`, the way the live sampler
/// would have seen them.
fn replay_log(timestamps: &[u64], session_end_ms: u64, config: &AppConfig) -> Vec<ReminderTrigger> {
    let mut aggregator = BlinkRateAggregator::new(config.window_duration_minutes);
    let mut policy = ReminderPolicy::new(config.policy.clone());

    let interval_ms = (config.sampling_interval_ms.as_millis() as u64).max(1);

    let mut triggers = Vec::new();
    let mut next_event = 0;
    let mut sample_ms = interval_ms;
    while sample_ms <= session_end_ms {
        while next_event < timestamps.len() && timestamps[next_event] <= sample_ms {
            aggregator.record(timestamps[next_event]);
            next_event += 1;
        }
        let metrics = aggregator.metrics(sample_ms);
        if let Some(trigger) = policy.evaluate(metrics.rate_per_minute, sample_ms).trigger {
            triggers.push(trigger);
        }
        sample_ms += interval_ms;
    }
    triggers
}
