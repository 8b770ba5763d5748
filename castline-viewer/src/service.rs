//! Viewer service: connect both channels and run their loops.

use std::path::PathBuf;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use castline_core::{
    CastError, Channel, FrameReceiver, FrameTransmitter, InputChannel, InputSource,
    PlaybackPipeline, Session, SessionRole, ZstdFrameDecoder,
};

use crate::config::ViewerConfig;
use crate::input_feed::{DemoInputSource, IdleInputSource};
use crate::render::StatsRenderer;

/// Connection attempts before giving up on a channel port.
const CONNECT_ATTEMPTS: u32 = 10;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// The top-level viewer service.
///
/// Connects to the host on both channel ports, then runs the
/// PlaybackPipeline (AV) and InputChannel (Input) loops on their own
/// tasks until cancellation or a loop-local fatal error. The two
/// channels fail independently: a lost AV session does not stop input
/// relay, and vice versa.
pub struct ViewerService {
    config: ViewerConfig,
    cancel: CancellationToken,
}

impl ViewerService {
    pub fn new(config: ViewerConfig) -> Self {
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
        let host = self.config.network.host_addr.clone();
        let display = self.config.display.clone();
        let input_cfg = self.config.input.clone();

        // AV channel: connect, then receive → decode → present.
        let av_task = {
            let host = host.clone();
            let cancel = self.cancel.clone();
            let port = self.config.network.av_port;
            tokio::spawn(async move {
                // The connect phase honors the same shutdown contract
                // as the loop it precedes: cancellation while still
                // dialing (or between retries) must end the task.
                let session = tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("shutdown before the av channel connected");
                        return Ok(());
                    }
                    session = connect_with_retry(&host, port, SessionRole::Sink, Channel::Av) => {
                        session?
                    }
                };
                let rx = FrameReceiver::new(session);
                let mut renderer = StatsRenderer::new(display.width, display.height);
                if !display.snapshot_dir.is_empty() && display.snapshot_every > 0 {
                    let dir = PathBuf::from(&display.snapshot_dir);
                    std::fs::create_dir_all(&dir)?;
                    renderer = renderer.with_snapshots(dir, display.snapshot_every);
                }
                let mut pipeline =
                    PlaybackPipeline::new(rx, ZstdFrameDecoder::new(), renderer, cancel);
                pipeline.run().await
            })
        };

        // Input channel: connect, then poll → batch → transmit.
        let input_task = {
            let cancel = self.cancel.clone();
            let port = self.config.network.input_port;
            tokio::spawn(async move {
                let session = tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("shutdown before the input channel connected");
                        return Ok(());
                    }
                    session = connect_with_retry(&host, port, SessionRole::Source, Channel::Input) => {
                        session?
                    }
                };
                let tx = FrameTransmitter::new(session);
                let interval = Duration::from_millis(input_cfg.poll_interval_ms);
                if input_cfg.demo {
                    run_input_channel(DemoInputSource::new(), tx, cancel, interval).await
                } else {
                    run_input_channel(IdleInputSource, tx, cancel, interval).await
                }
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

async fn run_input_channel<S: InputSource>(
    source: S,
    tx: FrameTransmitter,
    cancel: CancellationToken,
    interval: Duration,
) -> Result<(), CastError> {
    let mut channel = InputChannel::new(source, tx, cancel).with_poll_interval(interval);
    channel.run().await
}

/// Connect to a channel port, retrying briefly so the viewer can be
/// started before the host finishes binding its listeners.
async fn connect_with_retry(
    host: &str,
    port: u16,
    role: SessionRole,
    channel: Channel,
) -> Result<Session, CastError> {
    let mut attempt = 1;
    loop {
        match Session::connect(host, port, role, channel).await {
            Ok(session) => return Ok(session),
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                warn!(
                    %channel,
                    attempt,
                    error = %e,
                    "connect failed, retrying"
                );
                attempt += 1;
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancellation_while_connecting_stops_the_service() {
        // A port nothing listens on, so every dial is refused and
        // both tasks sit in the connect/retry phase.
        let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = probe.local_addr().unwrap().port();
        drop(probe);

        let mut config = ViewerConfig::default();
        config.network.host_addr = "127.0.0.1".into();
        config.network.av_port = port;
        config.network.input_port = port;

        let service = ViewerService::new(config);
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
