//! Viewer-side AV loop: receive → decode → render.

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::collab::{Renderer, VideoDecoder};
use crate::error::CastError;
use crate::framing::FrameReceiver;

/// Drives one framed unit per iteration through the decoder and onto
/// the renderer.
///
/// Each iteration: receive one packet → submit its payload to the
/// decoder → drain every picture the decoder has ready → present each
/// at the renderer's current surface size (the renderer owns any
/// format/size conversion; the encoded size is never assumed to match
/// the surface).
///
/// A zero-length payload is a well-formed no-op frame: the receive
/// completes without blocking and the decoder is never handed an
/// empty buffer.
///
/// A receive or decode error is fatal to this loop, mirroring the
/// capture side's cleanup discipline.
pub struct PlaybackPipeline<D, R> {
    rx: FrameReceiver,
    decoder: D,
    renderer: R,
    cancel: CancellationToken,
    frames_presented: u64,
}

impl<D: VideoDecoder, R: Renderer> PlaybackPipeline<D, R> {
    pub fn new(rx: FrameReceiver, decoder: D, renderer: R, cancel: CancellationToken) -> Self {
        Self {
            rx,
            decoder,
            renderer,
            cancel,
            frames_presented: 0,
        }
    }

    /// Pictures handed to the renderer so far.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Run until cancelled or a fatal error.
    pub async fn run(&mut self) -> Result<(), CastError> {
        loop {
            if self.cancel.is_cancelled() {
                info!(frames = self.frames_presented, "playback pipeline cancelled");
                return Ok(());
            }

            // A blocked receive must still observe shutdown, so race
            // it against the token rather than only polling between
            // iterations.
            let packet = tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!(frames = self.frames_presented, "playback pipeline cancelled");
                    return Ok(());
                }
                result = self.rx.receive() => match result {
                    Ok(packet) => packet,
                    Err(e) => {
                        error!(error = %e, "playback pipeline stopped");
                        return Err(e);
                    }
                },
            };

            if packet.payload.is_empty() {
                trace!("empty payload — no-op frame skipped");
                continue;
            }

            if let Err(e) = self.decode_and_present(&packet.payload) {
                error!(error = %e, "playback pipeline stopped");
                return Err(e);
            }
        }
    }

    fn decode_and_present(&mut self, payload: &[u8]) -> Result<(), CastError> {
        self.decoder.submit(payload)?;

        // Drain until the decoder reports nothing ready — not an error.
        while let Some(picture) = self.decoder.drain()? {
            let target = self.renderer.surface_size();
            self.renderer.present(&picture, target)?;
            self.frames_presented += 1;
            debug!(
                width = picture.width,
                height = picture.height,
                total = self.frames_presented,
                "picture presented"
            );
        }

        Ok(())
    }
}
