//! Viewer-side input loop: poll → batch → transmit.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::collab::InputSource;
use crate::error::CastError;
use crate::framing::FrameTransmitter;
use crate::header::FrameHeader;
use crate::input::InputBatch;

/// Default polling tick: ~125 Hz keeps input latency well under a
/// frame interval without busy-spinning.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(8);

/// Collects local input events each tick and ships non-empty batches
/// on the Input session.
///
/// Batches are framed with the shared header codec; width and height
/// are unused on this channel and transmitted as zero. Empty batches
/// are never transmitted, so a `payload_bytes = 0` unit never
/// originates here.
pub struct InputChannel<S> {
    tx: FrameTransmitter,
    source: S,
    cancel: CancellationToken,
    poll_interval: Duration,
    batches_sent: u64,
}

impl<S: InputSource> InputChannel<S> {
    pub fn new(source: S, tx: FrameTransmitter, cancel: CancellationToken) -> Self {
        Self {
            tx,
            source,
            cancel,
            poll_interval: DEFAULT_POLL_INTERVAL,
            batches_sent: 0,
        }
    }

    /// Override the polling tick.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Batches transmitted so far.
    pub fn batches_sent(&self) -> u64 {
        self.batches_sent
    }

    /// Run until cancelled or a fatal transmit error.
    pub async fn run(&mut self) -> Result<(), CastError> {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!(batches = self.batches_sent, "input channel cancelled");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }

            let events = self.source.poll_events();
            if events.is_empty() {
                continue;
            }

            let batch = InputBatch::new(events);
            let payload = batch.encode();
            let header = FrameHeader::new(0, 0, payload.len() as u64);

            if let Err(e) = self.tx.transmit(&header, &payload).await {
                error!(error = %e, "input channel stopped");
                return Err(e);
            }
            self.batches_sent += 1;
            debug!(
                events = batch.len(),
                total = self.batches_sent,
                "input batch transmitted"
            );
        }
    }
}
