//! Host service: accept both channels and run their loops.

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use castline_core::{
    CapturePipeline, Channel, FrameReceiver, FrameTransmitter, InputDispatcher, Session,
    SessionRole, ZstdFrameEncoder,
};

use crate::config::HostConfig;
use crate::inject::TraceInjector;
use crate::source::PatternSource;

/// The top-level host service.
///
/// Accepts exactly one viewer per channel port, then runs the
/// CapturePipeline (AV) and InputDispatcher (Input) loops on their
/// own tasks until cancellation or a loop-local fatal error. The two
/// channels fail independently: a lost AV session does not stop input
/// replay, and vice versa.
pub struct HostService {
    config: HostConfig,
    cancel: CancellationToken,
}

impl HostService {
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// A token that can cancel both loops from another task.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run until both loops have ended.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let bind = self.config.network.bind_addr.clone();
        let video = self.config.video.clone();

        // AV channel: accept, then capture → encode → transmit.
        let av_task = {
            let bind = bind.clone();
            let cancel = self.cancel.clone();
            let port = self.config.network.av_port;
            tokio::spawn(async move {
                // The accept phase honors the same shutdown contract
                // as the loop it precedes: cancellation while no
                // viewer has connected yet must end the task.
                let session = tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("shutdown before a viewer connected on the av channel");
                        return Ok(());
                    }
                    session = Session::accept_once(&bind, port, SessionRole::Source, Channel::Av) => {
                        session?
                    }
                };
                let tx = FrameTransmitter::new(session);
                let source = PatternSource::new(video.width, video.height);
                let encoder = ZstdFrameEncoder::new(video.compression_level);
                let mut pipeline =
                    CapturePipeline::new(source, encoder, tx, cancel).with_target_fps(video.fps);
                pipeline.run().await
            })
        };

        // Input channel: accept, then receive → replay.
        let input_task = {
            let cancel = self.cancel.clone();
            let port = self.config.network.input_port;
            tokio::spawn(async move {
                let session = tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("shutdown before a viewer connected on the input channel");
                        return Ok(());
                    }
                    session = Session::accept_once(&bind, port, SessionRole::Sink, Channel::Input) => {
                        session?
                    }
                };
                let rx = FrameReceiver::new(session);
                let mut dispatcher = InputDispatcher::new(rx, TraceInjector::new(), cancel);
                dispatcher.run().await
            })
        };

        // Join both loops; each channel's outcome is reported on its
        // own and neither cancels the other.
        let (av, input) = tokio::join!(av_task, input_task);
        match av {
            Ok(Ok(())) => info!("av channel finished"),
            Ok(Err(e)) => error!(error = %e, "av channel failed"),
            Err(e) => error!(error = %e, "av task panicked"),
        }
        match input {
            Ok(Ok(())) => info!("input channel finished"),
            Ok(Err(e)) => error!(error = %e, "input channel failed"),
            Err(e) => error!(error = %e, "input task panicked"),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn cancellation_while_waiting_for_a_viewer_stops_the_service() {
        let mut config = HostConfig::default();
        config.network.bind_addr = "127.0.0.1".into();
        config.network.av_port = 0;
        config.network.input_port = 0;

        // No viewer ever connects; both tasks sit in the accept
        // phase. Cancellation alone must bring run() home.
        let service = HostService::new(config);
        let cancel = service.cancel_handle();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            cancel.cancel();
        });

        tokio::time::timeout(Duration::from_secs(2), service.run())
            .await
            .expect("service did not stop after cancellation")
            .unwrap();
    }
}
