//! Exact-byte framing of (header, payload) units over a [`Session`].
//!
//! A [`FrameTransmitter`] writes the 64-byte header and then the
//! payload as two sequential writes on the same stream; since the
//! session is exclusively owned by one loop, no other writer can
//! interleave and the peer observes the pair as contiguous. A
//! [`FrameReceiver`] mirrors this: read exactly 64 bytes, decode, read
//! exactly the declared payload length.
//!
//! On any failure nothing partial is ever handed downstream — the
//! owning pipeline loop must stop (there is no partial-frame resend).

use bytes::Bytes;

use crate::error::CastError;
use crate::header::{FrameHeader, HEADER_LEN, HeaderBytes};
use crate::session::Session;

/// Upper bound a received header may declare before we allocate.
///
/// A corrupt length field must not be able to balloon memory; 64 MiB
/// comfortably covers an uncompressed 4K BGRA frame.
pub const MAX_PAYLOAD_BYTES: u64 = 64 * 1024 * 1024;

// ── FramePacket ──────────────────────────────────────────────────

/// One header plus its exact-length payload.
///
/// Produced by a pipeline's encoder (transmit side) or by
/// [`FrameReceiver::receive`] (receive side). The payload is an
/// owned [`Bytes`] buffer that is moved, never copied, between
/// pipeline stages.
#[derive(Debug, Clone)]
pub struct FramePacket {
    pub header: FrameHeader,
    pub payload: Bytes,
}

// ── FrameTransmitter ─────────────────────────────────────────────

/// Writes framed units on an exclusively-owned session.
pub struct FrameTransmitter {
    session: Session,
}

impl FrameTransmitter {
    /// Take ownership of the session this transmitter will write to.
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Write `header` then `payload` as one logical unit.
    ///
    /// The header's `payload_bytes` must equal `payload.len()`; this
    /// is the core wire invariant and is checked here in every build
    /// profile rather than trusted to every call site. A mismatch
    /// fails with [`CastError::LengthMismatch`] before any byte is
    /// written, leaving the session usable.
    pub async fn transmit(
        &mut self,
        header: &FrameHeader,
        payload: &[u8],
    ) -> Result<(), CastError> {
        if header.payload_bytes() != payload.len() as u64 {
            return Err(CastError::LengthMismatch {
                declared: header.payload_bytes(),
                actual: payload.len(),
            });
        }

        let header_bytes = header.encode()?;
        self.session.write_all(&header_bytes).await?;
        self.session.write_all(payload).await?;
        Ok(())
    }

    /// Whether the underlying session has reached its terminal state.
    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }

    /// Access the owned session (diagnostics only).
    pub fn session(&self) -> &Session {
        &self.session
    }
}

// ── FrameReceiver ────────────────────────────────────────────────

/// Reads framed units from an exclusively-owned session.
pub struct FrameReceiver {
    session: Session,
}

impl FrameReceiver {
    /// Take ownership of the session this receiver will read from.
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Read exactly one unit: 64-byte header, then the declared
    /// payload length.
    ///
    /// Fails with [`CastError::MalformedHeader`] or [`CastError::Io`];
    /// on either, no partial packet is returned and the owning loop
    /// must stop. A declared length of zero completes immediately with
    /// an empty payload.
    pub async fn receive(&mut self) -> Result<FramePacket, CastError> {
        let mut header_bytes: HeaderBytes = [0u8; HEADER_LEN];
        self.session.read_exact(&mut header_bytes).await?;

        let header = FrameHeader::decode(&header_bytes)?;
        let len = header.payload_bytes();
        if len > MAX_PAYLOAD_BYTES {
            return Err(CastError::PayloadTooLarge {
                size: len,
                max: MAX_PAYLOAD_BYTES,
            });
        }

        let mut payload = vec![0u8; len as usize];
        self.session.read_exact(&mut payload).await?;

        Ok(FramePacket {
            header,
            payload: Bytes::from(payload),
        })
    }

    /// Whether the underlying session has reached its terminal state.
    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }

    /// Access the owned session (diagnostics only).
    pub fn session(&self) -> &Session {
        &self.session
    }
}
