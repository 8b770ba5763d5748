//! Host-side input loop: receive → decode batch → replay.

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::collab::InputInjector;
use crate::error::CastError;
use crate::framing::FrameReceiver;
use crate::input::InputBatch;

/// Receives input batches from the viewer and replays each event, in
/// original order, through the local input-injection capability.
///
/// Mirrors the playback loop's shape but has no decode stage: the
/// payload is reinterpreted directly as a run of fixed-size event
/// records. A payload that is not a whole number of records is a
/// protocol error and terminal for this loop. An empty payload is a
/// no-op batch.
pub struct InputDispatcher<I> {
    rx: FrameReceiver,
    injector: I,
    cancel: CancellationToken,
    events_replayed: u64,
}

impl<I: InputInjector> InputDispatcher<I> {
    pub fn new(rx: FrameReceiver, injector: I, cancel: CancellationToken) -> Self {
        Self {
            rx,
            injector,
            cancel,
            events_replayed: 0,
        }
    }

    /// Events replayed so far.
    pub fn events_replayed(&self) -> u64 {
        self.events_replayed
    }

    /// Run until cancelled or a fatal error.
    pub async fn run(&mut self) -> Result<(), CastError> {
        loop {
            let packet = tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!(events = self.events_replayed, "input dispatcher cancelled");
                    return Ok(());
                }
                result = self.rx.receive() => match result {
                    Ok(packet) => packet,
                    Err(e) => {
                        error!(error = %e, "input dispatcher stopped");
                        return Err(e);
                    }
                },
            };

            let batch = match InputBatch::decode(&packet.payload) {
                Ok(batch) => batch,
                Err(e) => {
                    error!(error = %e, "input dispatcher stopped");
                    return Err(e);
                }
            };
            if batch.is_empty() {
                trace!("empty batch — nothing to replay");
                continue;
            }

            let count = batch.len();
            for event in batch {
                if let Err(e) = self.injector.replay(&event) {
                    error!(error = %e, "input dispatcher stopped");
                    return Err(e);
                }
                self.events_replayed += 1;
            }
            debug!(
                events = count,
                total = self.events_replayed,
                "input batch replayed"
            );
        }
    }
}
