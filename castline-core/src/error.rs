//! Domain-specific error types for the castline transport.
//!
//! All fallible operations return `Result<T, CastError>`.
//! No panics on invalid input — every error is typed.

use thiserror::Error;

/// The canonical error type for the castline transport.
#[derive(Debug, Error)]
pub enum CastError {
    // ── Header codec errors ──────────────────────────────────────
    /// The formatted header text exceeds the fixed 64-byte slot.
    ///
    /// This is a programmer/configuration error at the call site,
    /// never a wire condition: the caller asked to frame a payload
    /// whose dimensions cannot be described in 64 ASCII bytes.
    #[error("header text too long: {len} bytes (max {max})")]
    HeaderOverflow { len: usize, max: usize },

    /// A received header is missing a delimiter or carries a
    /// non-numeric field.
    #[error("malformed header: {0}")]
    MalformedHeader(&'static str),

    // ── Framing errors ───────────────────────────────────────────
    /// A header declared a payload larger than the receive guard.
    ///
    /// Caught before allocation so a corrupt length field cannot
    /// balloon memory.
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: u64, max: u64 },

    /// A header handed to transmit declares a payload length other
    /// than the buffer's actual length. Caught before any byte is
    /// written, so the peer's framing never desynchronizes.
    #[error("header declares {declared} payload bytes, buffer has {actual}")]
    LengthMismatch { declared: u64, actual: usize },

    /// An input batch payload is not a whole number of event records.
    #[error("invalid input batch: {len} bytes is not a multiple of {record_size}")]
    InvalidBatch { len: usize, record_size: usize },

    /// An input record carried an unknown tag or button value.
    #[error("unknown {field} value: {value:#x}")]
    UnknownVariant { field: &'static str, value: u32 },

    // ── Session errors ───────────────────────────────────────────
    /// The TCP/IO layer reported an error, including EOF before a
    /// complete unit was transferred. Terminal for the owning Session.
    #[error("session I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An operation was attempted on a Session already in the
    /// terminal `Closed` state.
    #[error("session closed")]
    SessionClosed,

    // ── Codec errors ─────────────────────────────────────────────
    /// The encoder or decoder reported an unrecoverable failure.
    /// Terminal for the owning pipeline loop.
    #[error("codec error: {0}")]
    Codec(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = CastError::HeaderOverflow { len: 70, max: 64 };
        assert!(e.to_string().contains("70"));
        assert!(e.to_string().contains("64"));

        let e = CastError::MalformedHeader("missing 'e' terminator");
        assert!(e.to_string().contains("missing 'e'"));

        let e = CastError::PayloadTooLarge {
            size: 1 << 30,
            max: 1 << 26,
        };
        assert!(e.to_string().contains("too large"));
    }

    #[test]
    fn from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "early eof");
        let e: CastError = io_err.into();
        assert!(matches!(e, CastError::Io(_)));
    }
}
