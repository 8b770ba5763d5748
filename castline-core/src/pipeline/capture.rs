//! Host-side AV loop: capture → encode → transmit.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::collab::{CaptureSource, VideoEncoder};
use crate::error::CastError;
use crate::framing::FrameTransmitter;
use crate::header::FrameHeader;

/// Drives one raw frame per iteration through the encoder and out the
/// AV session.
///
/// Each iteration: check the cancellation token → acquire one raw
/// frame (blocking) → submit to the encoder → drain every packet the
/// encoder has ready → transmit each as a framed unit. The encoder may
/// buffer internally, so a submit can yield zero packets (nothing sent
/// this iteration) or several.
///
/// A capture, encode, or transmit error is fatal to this loop: it is
/// logged and propagated, and the encoder context and capture source
/// are released by drop in reverse acquisition order.
pub struct CapturePipeline<S, E> {
    tx: FrameTransmitter,
    encoder: E,
    source: S,
    cancel: CancellationToken,
    /// Pace iterations to this many frames per second; `None` streams
    /// as fast as the capture source delivers.
    target_fps: Option<u8>,
    packets_sent: u64,
}

impl<S: CaptureSource, E: VideoEncoder> CapturePipeline<S, E> {
    pub fn new(source: S, encoder: E, tx: FrameTransmitter, cancel: CancellationToken) -> Self {
        Self {
            tx,
            encoder,
            source,
            cancel,
            target_fps: None,
            packets_sent: 0,
        }
    }

    /// Enable frame pacing at `fps` iterations per second.
    pub fn with_target_fps(mut self, fps: u8) -> Self {
        self.target_fps = (fps > 0).then_some(fps);
        self
    }

    /// Framed units transmitted so far.
    pub fn packets_sent(&self) -> u64 {
        self.packets_sent
    }

    /// Run until cancelled or a fatal error.
    pub async fn run(&mut self) -> Result<(), CastError> {
        let interval = self
            .target_fps
            .map(|fps| Duration::from_secs_f64(1.0 / fps as f64));

        loop {
            if self.cancel.is_cancelled() {
                info!(packets = self.packets_sent, "capture pipeline cancelled");
                return Ok(());
            }
            let iteration_start = Instant::now();

            if let Err(e) = self.iterate().await {
                error!(error = %e, "capture pipeline stopped");
                return Err(e);
            }

            if let Some(interval) = interval {
                let elapsed = iteration_start.elapsed();
                if elapsed < interval {
                    tokio::time::sleep(interval - elapsed).await;
                }
            }
        }
    }

    /// One capture → encode → drain → transmit pass.
    async fn iterate(&mut self) -> Result<(), CastError> {
        let raw = self.source.next_raw_frame()?;
        self.encoder.submit(&raw)?;

        // Drain until the encoder reports nothing ready — not an error.
        while let Some(packet) = self.encoder.drain()? {
            let header = FrameHeader::new(packet.width, packet.height, packet.data.len() as u64);
            self.tx.transmit(&header, &packet.data).await?;
            self.packets_sent += 1;
            debug!(
                width = packet.width,
                height = packet.height,
                bytes = packet.data.len(),
                total = self.packets_sent,
                "packet transmitted"
            );
        }

        Ok(())
    }
}
