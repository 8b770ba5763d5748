//! # castline-core
//!
//! Transport library for streaming a captured screen over a private
//! TCP link and relaying the viewer's input back for remote control.
//!
//! Two roles share the link: the **host** captures, encodes, and
//! transmits video; the **viewer** receives, decodes, and renders it,
//! and transmits input events back. Each direction runs on its own
//! TCP connection (the AV and Input channels), and every payload on
//! either channel is framed by the same fixed 64-byte ASCII header.
//!
//! This crate contains:
//! - **Header**: `FrameHeader` — the 64-byte ASCII header codec
//! - **Session**: one exclusively-owned TCP stream per channel with
//!   all-or-nothing read/write and a terminal closed state
//! - **Framing**: `FrameTransmitter` / `FrameReceiver` /
//!   `FramePacket` — exact-byte units over a session
//! - **Input**: fixed-size input event records and batches
//! - **Collab**: the narrow traits the pipelines drive (capture
//!   source, video codec, renderer, input polling/injection)
//! - **Codec**: a zstd reference implementation of the codec traits
//! - **Pipeline**: the four loops — `CapturePipeline`,
//!   `PlaybackPipeline`, `InputChannel`, `InputDispatcher`
//! - **Error**: `CastError` — typed, `thiserror`-based hierarchy

pub mod codec;
pub mod collab;
pub mod error;
pub mod framing;
pub mod header;
pub mod input;
pub mod pipeline;
pub mod session;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use codec::{ZstdFrameDecoder, ZstdFrameEncoder};
pub use collab::{
    CaptureSource, EncodedPacket, InputInjector, InputSource, Picture, PixelFormat, RawFrame,
    Renderer, VideoDecoder, VideoEncoder,
};
pub use error::CastError;
pub use framing::{FramePacket, FrameReceiver, FrameTransmitter, MAX_PAYLOAD_BYTES};
pub use header::{FrameHeader, HEADER_LEN, HeaderBytes};
pub use input::{EVENT_RECORD_SIZE, InputBatch, InputEvent, KeyModifiers, MouseButton};
pub use pipeline::{CapturePipeline, InputChannel, InputDispatcher, PlaybackPipeline};
pub use session::{Channel, Session, SessionRole};
