//! Narrow interfaces to the external collaborators the pipelines
//! drive: screen capture, video codec, renderer, input polling and
//! input injection.
//!
//! All calls are blocking and synchronous by contract; a pipeline loop
//! suspends exactly at these calls plus its session I/O. The codec
//! traits follow the submit / drain-until-not-ready protocol: one
//! submitted unit may yield zero or more drained units, and
//! `drain() -> Ok(None)` means "nothing ready right now" — it is
//! never an error.

use bytes::Bytes;

use crate::error::CastError;
use crate::input::InputEvent;

// ── PixelFormat ──────────────────────────────────────────────────

/// Pixel layout for raw captured frames and decoded pictures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 4 bytes per pixel: Blue, Green, Red, Alpha.
    Bgra8,
    /// 4 bytes per pixel: Red, Green, Blue, Alpha.
    Rgba8,
    /// 3 bytes per pixel: Red, Green, Blue.
    Rgb8,
}

impl PixelFormat {
    /// Bytes consumed by a single pixel in this format.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgra8 | PixelFormat::Rgba8 => 4,
            PixelFormat::Rgb8 => 3,
        }
    }
}

// ── RawFrame ─────────────────────────────────────────────────────

/// A raw, uncompressed frame as produced by the capture source.
///
/// The `data` buffer holds `height` rows of `stride` bytes each;
/// `stride` may exceed `width * bytes_per_pixel` due to driver
/// row-alignment requirements.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Row pitch in bytes (may exceed `width * bpp`).
    pub stride: u32,
    /// Pixel layout.
    pub format: PixelFormat,
    /// Raw pixel data, `stride * height` bytes.
    pub data: Vec<u8>,
}

impl RawFrame {
    /// Row `y` including any padding bytes.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride as usize;
        &self.data[start..start + self.stride as usize]
    }
}

// ── EncodedPacket ────────────────────────────────────────────────

/// One compressed packet emitted by the encoder, ready for framing.
///
/// Owned by the capture pipeline until handed to the transmitter;
/// the payload buffer is moved, not copied.
#[derive(Debug, Clone)]
pub struct EncodedPacket {
    /// Encoded frame width in pixels.
    pub width: u32,
    /// Encoded frame height in pixels.
    pub height: u32,
    /// Compressed bitstream bytes.
    pub data: Bytes,
}

// ── Picture ──────────────────────────────────────────────────────

/// One decoded picture emitted by the decoder, ready for rendering.
#[derive(Debug, Clone)]
pub struct Picture {
    /// Picture width in pixels.
    pub width: u32,
    /// Picture height in pixels.
    pub height: u32,
    /// Pixel layout of `data`.
    pub format: PixelFormat,
    /// Tightly packed pixel rows (`width * bpp * height` bytes).
    pub data: Vec<u8>,
}

// ── Capture side ─────────────────────────────────────────────────

/// Hardware/driver capture API producing raw pixel buffers on demand.
pub trait CaptureSource {
    /// Acquire the next raw frame. Blocks until one is available.
    fn next_raw_frame(&mut self) -> Result<RawFrame, CastError>;
}

/// Stateful video encoder with an internal retry-until-drained
/// contract.
pub trait VideoEncoder {
    /// Submit one raw frame for encoding.
    fn submit(&mut self, frame: &RawFrame) -> Result<(), CastError>;

    /// Pull the next packet the encoder has ready, or `Ok(None)` when
    /// nothing is ready now. Callers drain until `None` after every
    /// submit — the encoder may buffer internally and emit zero or
    /// more packets per submitted frame.
    fn drain(&mut self) -> Result<Option<EncodedPacket>, CastError>;
}

// ── Playback side ────────────────────────────────────────────────

/// Stateful video decoder, the mirror of [`VideoEncoder`].
pub trait VideoDecoder {
    /// Submit one compressed packet for decoding.
    fn submit(&mut self, packet: &[u8]) -> Result<(), CastError>;

    /// Pull the next decoded picture, or `Ok(None)` when nothing is
    /// ready now.
    fn drain(&mut self) -> Result<Option<Picture>, CastError>;
}

/// Window/surface abstraction that accepts decoded pixel buffers.
///
/// The surface size may differ from the incoming picture's encoded
/// size; `present` owns the format/size conversion, and the pipeline
/// never assumes equality.
pub trait Renderer {
    /// Current surface size in pixels, passed back to `present` as
    /// the conversion target.
    fn surface_size(&self) -> (u32, u32);

    /// Convert `picture` to the surface's format/size and display it.
    fn present(&mut self, picture: &Picture, target_size: (u32, u32)) -> Result<(), CastError>;
}

// ── Input side ───────────────────────────────────────────────────

/// Local mouse/keyboard polling on the viewer.
pub trait InputSource {
    /// Collect the events observed since the last poll, in order.
    /// Non-blocking; may return an empty list.
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

/// OS input-injection capability on the host.
pub trait InputInjector {
    /// Replay one event into the local input stream.
    fn replay(&mut self, event: &InputEvent) -> Result<(), CastError>;
}
