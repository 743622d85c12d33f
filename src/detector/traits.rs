use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::models::BlinkEvent;

/// Custom error type for blink source operations.
#[derive(Error, Debug)]
pub enum SourceError {
    /// I/O failure while reading from the underlying stream or device.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The channel for communicating with the intake task was closed
    /// unexpectedly.
    #[error("Channel closed")]
    ChannelClosed,
}

/// A trait for an upstream source of blink events.
///
/// Implementations push one `BlinkEvent` per detected blink into the channel until the stream
/// ends or cancellation is requested. A source returning `Ok(())` means the event stream is
/// exhausted and the monitoring session is over.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlinkSource: Send + Sync {
    /// Runs the source until exhaustion or cancellation.
    async fn run(
        &self,
        events: mpsc::Sender<BlinkEvent>,
        cancellation_token: CancellationToken,
    ) -> Result<(), SourceError>;
}
