//! Zstd-based reference codec.
//!
//! A stateful encoder/decoder pair implementing the submit/drain
//! collaborator contract with zstd frame compression. Each packet is
//! self-describing: the compressed stream holds a small picture
//! preamble followed by tightly packed pixel rows, so the decode side
//! needs nothing beyond the packet bytes — the same property a real
//! video bitstream has.
//!
//! ## Packet layout (before compression, little-endian)
//!
//! ```text
//! width:   u32  (4)
//! height:  u32  (4)
//! format:  u8   (1)  0 = Bgra8, 1 = Rgba8, 2 = Rgb8
//! pixels:  [u8] (width * bpp * height, rows packed tightly)
//! ```

use std::collections::VecDeque;

use bytes::Bytes;

use crate::collab::{EncodedPacket, Picture, PixelFormat, RawFrame, VideoDecoder, VideoEncoder};
use crate::error::CastError;

const PREAMBLE_LEN: usize = 9;

fn format_to_wire(format: PixelFormat) -> u8 {
    match format {
        PixelFormat::Bgra8 => 0,
        PixelFormat::Rgba8 => 1,
        PixelFormat::Rgb8 => 2,
    }
}

fn format_from_wire(value: u8) -> Result<PixelFormat, CastError> {
    match value {
        0 => Ok(PixelFormat::Bgra8),
        1 => Ok(PixelFormat::Rgba8),
        2 => Ok(PixelFormat::Rgb8),
        other => Err(CastError::Codec(format!("unknown pixel format tag {other}"))),
    }
}

// ── ZstdFrameEncoder ─────────────────────────────────────────────

/// Compresses raw frames into self-describing zstd packets.
pub struct ZstdFrameEncoder {
    /// Zstd compression level (1 = fast, 19 = max). Real-time streams
    /// want 1–3.
    level: i32,
    ready: VecDeque<EncodedPacket>,
    frames_encoded: u64,
}

impl ZstdFrameEncoder {
    /// Create an encoder at the given zstd level.
    pub fn new(level: i32) -> Self {
        Self {
            level,
            ready: VecDeque::new(),
            frames_encoded: 0,
        }
    }

    /// Frames submitted and encoded so far.
    pub fn frames_encoded(&self) -> u64 {
        self.frames_encoded
    }

    /// Pack rows tightly, dropping any stride padding.
    fn pack_rows(frame: &RawFrame) -> Vec<u8> {
        let row_len = frame.width as usize * frame.format.bytes_per_pixel();
        let mut out = Vec::with_capacity(PREAMBLE_LEN + row_len * frame.height as usize);
        out.extend_from_slice(&frame.width.to_le_bytes());
        out.extend_from_slice(&frame.height.to_le_bytes());
        out.push(format_to_wire(frame.format));
        for y in 0..frame.height {
            out.extend_from_slice(&frame.row(y)[..row_len]);
        }
        out
    }
}

impl VideoEncoder for ZstdFrameEncoder {
    fn submit(&mut self, frame: &RawFrame) -> Result<(), CastError> {
        let raw = Self::pack_rows(frame);
        let compressed = zstd::encode_all(raw.as_slice(), self.level)
            .map_err(|e| CastError::Codec(format!("zstd encode failed: {e}")))?;

        self.frames_encoded += 1;
        self.ready.push_back(EncodedPacket {
            width: frame.width,
            height: frame.height,
            data: Bytes::from(compressed),
        });
        Ok(())
    }

    fn drain(&mut self) -> Result<Option<EncodedPacket>, CastError> {
        Ok(self.ready.pop_front())
    }
}

// ── ZstdFrameDecoder ─────────────────────────────────────────────

/// Decompresses zstd packets back into pictures.
pub struct ZstdFrameDecoder {
    ready: VecDeque<Picture>,
    frames_decoded: u64,
}

impl ZstdFrameDecoder {
    pub fn new() -> Self {
        Self {
            ready: VecDeque::new(),
            frames_decoded: 0,
        }
    }

    /// Pictures decoded so far.
    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }
}

impl Default for ZstdFrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoDecoder for ZstdFrameDecoder {
    fn submit(&mut self, packet: &[u8]) -> Result<(), CastError> {
        let raw = zstd::decode_all(packet)
            .map_err(|e| CastError::Codec(format!("zstd decode failed: {e}")))?;

        if raw.len() < PREAMBLE_LEN {
            return Err(CastError::Codec(format!(
                "packet preamble truncated: {} bytes",
                raw.len()
            )));
        }

        let width = u32::from_le_bytes(raw[0..4].try_into().expect("preamble"));
        let height = u32::from_le_bytes(raw[4..8].try_into().expect("preamble"));
        let format = format_from_wire(raw[8])?;

        let expected = width as usize * format.bytes_per_pixel() * height as usize;
        let pixels = &raw[PREAMBLE_LEN..];
        if pixels.len() != expected {
            return Err(CastError::Codec(format!(
                "pixel payload is {} bytes, expected {expected} for {width}x{height}",
                pixels.len()
            )));
        }

        self.frames_decoded += 1;
        self.ready.push_back(Picture {
            width,
            height,
            format,
            data: pixels.to_vec(),
        });
        Ok(())
    }

    fn drain(&mut self) -> Result<Option<Picture>, CastError> {
        Ok(self.ready.pop_front())
    }
}

// ── Tests ────────────────────────────────────────────────────────
