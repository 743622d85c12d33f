//! The Supervisor module manages the lifecycle of a blinkwatch monitoring session.
//!
//! The supervisor is the top-level owner of the session's components: the blink source, the
//! shared aggregator, and the sampling bridge. It wires them together (via
//! `SupervisorBuilder`), starts them as supervised tasks, listens for shutdown signals, and
//! orchestrates a clean shutdown: if a critical task fails, all other tasks are brought down
//! rather than continuing in a partially-functional state.

mod builder;

use std::sync::Arc;

use builder::SupervisorBuilder;
use thiserror::Error;
use tokio::{
    signal,
    sync::{mpsc, Mutex},
};

use crate::{
    clock::Clock,
    config::AppConfig,
    detector::BlinkSource,
    engine::{aggregator::BlinkRateAggregator, sampler::RateSampler},
    models::BlinkEvent,
};

/// Represents the set of errors that can occur during the supervisor's
/// operation.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// A required configuration was not provided to the `SupervisorBuilder`.
    #[error("Missing configuration for Supervisor")]
    MissingConfig,

    /// A blink source was not provided to the `SupervisorBuilder`.
    #[error("Missing blink source for Supervisor")]
    MissingBlinkSource,

    /// An error occurred due to an invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// The primary runtime manager for one monitoring session.
///
/// Owns all the session's components and is responsible for their startup, shutdown, and
/// health monitoring. Once `run` is called, it becomes the main process loop for the entire
/// application.
pub struct Supervisor {
    /// Shared application configuration.
    config: Arc<AppConfig>,

    /// The shared aggregator, written by the intake task and read by the sampler.
    aggregator: Arc<Mutex<BlinkRateAggregator>>,

    /// The upstream source of blink events.
    source: Arc<dyn BlinkSource>,

    /// The sampling bridge driving the reminder policy.
    sampler: RateSampler,

    /// The session time source, used for the final metrics snapshot.
    clock: Arc<dyn Clock>,

    /// A token used to signal a graceful shutdown to all supervised tasks.
    cancellation_token: tokio_util::sync::CancellationToken,

    /// A set of all spawned tasks that the supervisor is actively managing.
    join_set: tokio::task::JoinSet<()>,
}

impl Supervisor {
    /// Creates a new Supervisor instance with all its required components.
    ///
    /// This is typically called by the `SupervisorBuilder` after it has
    /// assembled all the necessary dependencies.
    pub(crate) fn new(
        config: AppConfig,
        aggregator: Arc<Mutex<BlinkRateAggregator>>,
        source: Arc<dyn BlinkSource>,
        sampler: RateSampler,
        clock: Arc<dyn Clock>,
        cancellation_token: tokio_util::sync::CancellationToken,
    ) -> Self {
        Self {
            config: Arc::new(config),
            aggregator,
            source,
            sampler,
            clock,
            cancellation_token,
            join_set: tokio::task::JoinSet::new(),
        }
    }

    /// Starts the supervisor and all its managed services.
    ///
    /// This method is the main entry point for the application's runtime. It
    /// performs the following steps:
    /// 1. Spawns a signal handler to listen for `SIGINT` (Ctrl+C) and `SIGTERM`.
    /// 2. Spawns the blink source, the intake task, and the sampling bridge.
    /// 3. Enters the main loop, which monitors task health via the `JoinSet`
    ///    and listens for the shutdown signal.
    /// 4. Upon shutdown, waits for all tasks to complete and logs a final
    ///    metrics snapshot, bounded by the configured timeout.
    pub async fn run(mut self) -> Result<(), SupervisorError> {
        // Clone the token for the signal handler task.
        let cancellation_token = self.cancellation_token.clone();

        // Spawn a task to listen for shutdown signals.
        self.join_set.spawn(async move {
            let ctrl_c = signal::ctrl_c();
            #[cfg(unix)]
            let terminate = async {
                match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    Ok(mut sigterm) => {
                        sigterm.recv().await;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to register SIGTERM handler.");
                        std::future::pending::<()>().await;
                    }
                }
            };
            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => tracing::info!("SIGINT (Ctrl+C) received, initiating graceful shutdown."),
                _ = terminate => tracing::info!("SIGTERM received, initiating graceful shutdown."),
                _ = cancellation_token.cancelled() => {}
            }

            // Notify all other tasks to begin shutting down.
            cancellation_token.cancel();
        });

        // --- Service Initialization ---

        // The channel that connects the blink source to the intake task.
        let (events_tx, mut events_rx) =
            mpsc::channel::<BlinkEvent>(self.config.event_channel_capacity as usize);

        // --- Task Spawning ---

        // Spawn the blink source. When the source's stream ends, the session is
        // over and the whole supervisor shuts down.
        let source = Arc::clone(&self.source);
        let source_token = self.cancellation_token.clone();
        self.join_set.spawn(async move {
            if let Err(e) = source.run(events_tx, source_token.clone()).await {
                tracing::error!(error = %e, "Blink source failed.");
            }
            source_token.cancel();
        });

        // Spawn the intake task feeding the shared aggregator.
        let aggregator = Arc::clone(&self.aggregator);
        let intake_token = self.cancellation_token.clone();
        self.join_set.spawn(async move {
            loop {
                tokio::select! {
                    biased;

                    _ = intake_token.cancelled() => {
                        tracing::info!("Blink intake cancellation signal received, shutting down...");
                        break;
                    }

                    event = events_rx.recv() => {
                        let Some(event) = event else { break };
                        aggregator.lock().await.record(event.timestamp_ms);
                    }
                }
            }
            tracing::info!("Blink intake has shut down.");
        });

        // Spawn the sampling bridge.
        self.join_set.spawn(self.sampler.run());

        // --- Main Supervisor Loop ---

        loop {
            tokio::select! {
                maybe_result = self.join_set.join_next() => {
                    match maybe_result {
                        Some(Ok(_)) => {
                            // Task completed successfully, continue monitoring.
                        }
                        Some(Err(e)) => {
                            tracing::error!("A critical task failed: {:?}. Initiating shutdown.", e);
                            self.cancellation_token.cancel();
                        }
                        None => {
                            // All tasks have completed.
                            break;
                        }
                    }
                }
                _ = self.cancellation_token.cancelled() => {
                    // Cancellation requested externally, break the loop.
                    break;
                }
            }
        }

        // --- Graceful Shutdown ---

        self.join_set.shutdown().await;
        tracing::info!("All supervised tasks have completed.");

        let shutdown_timeout = self.config.shutdown_timeout;
        let aggregator = Arc::clone(&self.aggregator);
        let clock = Arc::clone(&self.clock);
        let cleanup_logic = async move {
            let metrics = aggregator.lock().await.metrics(clock.now_ms());
            tracing::info!(
                rate_per_minute = metrics.rate_per_minute,
                event_count = metrics.event_count,
                "Final session metrics."
            );
        };

        if tokio::time::timeout(shutdown_timeout, cleanup_logic).await.is_err() {
            tracing::warn!(
                "Cleanup did not complete within the timeout of {:?}. Continuing shutdown.",
                shutdown_timeout
            );
        }

        tracing::info!("Supervisor shutdown complete.");
        Ok(())
    }

    /// Returns a new `SupervisorBuilder` instance.
    ///
    /// This is the public entry point for creating a supervisor.
    pub fn builder() -> SupervisorBuilder {
        SupervisorBuilder::new()
    }
}
