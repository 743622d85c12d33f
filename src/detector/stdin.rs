use std::sync::Arc;

use async_trait::async_trait;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tokio_util::sync::CancellationToken;

use crate::{
    clock::Clock,
    detector::traits::{BlinkSource, SourceError},
    models::BlinkEvent,
};

/// A blink source reading one event per line from standard input.
///
/// A line holding a plain integer is taken as an explicit millisecond timestamp (useful when a
/// detector process pipes recorded timings); any other non-empty line is stamped with the
/// session clock at arrival. EOF ends the monitoring session.
pub struct StdinBlinkSource {
    clock: Arc<dyn Clock>,
}

impl StdinBlinkSource {
    /// Creates a stdin source stamping events with the given clock.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Pumps lines from `reader` into the event channel until EOF or cancellation.
    async fn pump_lines<R>(
        &self,
        reader: R,
        events: mpsc::Sender<BlinkEvent>,
        cancellation_token: CancellationToken,
    ) -> Result<(), SourceError>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        let mut lines = reader.lines();
        loop {
            tokio::select! {
                biased;

                _ = cancellation_token.cancelled() => {
                    tracing::info!(
                        "StdinBlinkSource cancellation signal received, shutting down..."
                    );
                    return Ok(());
                }

                line = lines.next_line() => {
                    let Some(line) = line? else {
                        tracing::info!("Blink input stream ended.");
                        return Ok(());
                    };
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let timestamp_ms =
                        line.parse::<u64>().unwrap_or_else(|_| self.clock.now_ms());
                    if events.send(BlinkEvent::new(timestamp_ms)).await.is_err() {
                        tracing::warn!("Blink event channel closed, stopping input.");
                        return Err(SourceError::ChannelClosed);
                    }
                }
            }
        }
    }
}

#[async_trait]
impl BlinkSource for StdinBlinkSource {
    async fn run(
        &self,
        events: mpsc::Sender<BlinkEvent>,
        cancellation_token: CancellationToken,
    ) -> Result<(), SourceError> {
        let reader = BufReader::new(tokio::io::stdin());
        self.pump_lines(reader, events, cancellation_token).await
    }
}
