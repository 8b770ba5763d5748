//! Fixed 64-byte ASCII frame header.
//!
//! Every payload on either channel is preceded by exactly 64 bytes of
//! ASCII text:
//!
//! ```text
//! "<width>x<height> <payload_bytes>e"   then '0'-padded to 64 bytes
//! ```
//!
//! e.g. a 1920×1080 frame with a 45000-byte compressed payload is
//! announced as `"1920x1080 45000e"` followed by 48 `'0'` bytes.
//!
//! Decoding is a strict three-delimiter scan: the first `'x'` splits
//! width from height, the first space after it splits height from the
//! length field, and the first `'e'` at or after that space terminates
//! the length field. The format is deliberately human-debuggable, but
//! it is **not** self-terminating text — callers must always read
//! exactly [`HEADER_LEN`] bytes and never treat this as a general text
//! protocol.
//!
//! For input batches, width and height are unused and transmitted as
//! zero; only `payload_bytes` is meaningful.

use crate::error::CastError;

/// Size of the header slot on the wire.
pub const HEADER_LEN: usize = 64;

/// Raw header bytes as they travel on the wire.
pub type HeaderBytes = [u8; HEADER_LEN];

/// Parsed frame header. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    width: u32,
    height: u32,
    payload_bytes: u64,
}

impl FrameHeader {
    /// Describe a payload of `payload_bytes` for a `width`×`height`
    /// frame. Input batches pass zero for both dimensions.
    pub fn new(width: u32, height: u32, payload_bytes: u64) -> Self {
        Self {
            width,
            height,
            payload_bytes,
        }
    }

    /// Frame width in pixels (zero on the input channel).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels (zero on the input channel).
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Exact number of payload bytes that follow the header.
    pub fn payload_bytes(&self) -> u64 {
        self.payload_bytes
    }

    /// Serialize to the 64-byte wire form.
    ///
    /// Fails with [`CastError::HeaderOverflow`] if the formatted text
    /// would exceed the slot — never silently truncates.
    pub fn encode(&self) -> Result<HeaderBytes, CastError> {
        let text = format!("{}x{} {}e", self.width, self.height, self.payload_bytes);
        if text.len() > HEADER_LEN {
            return Err(CastError::HeaderOverflow {
                len: text.len(),
                max: HEADER_LEN,
            });
        }

        let mut buf: HeaderBytes = [b'0'; HEADER_LEN];
        buf[..text.len()].copy_from_slice(text.as_bytes());
        Ok(buf)
    }

    /// Parse the 64-byte wire form.
    ///
    /// Fails with [`CastError::MalformedHeader`] when a delimiter is
    /// absent or a field is not an unsigned decimal integer. Never
    /// reads past the 64-byte slot.
    pub fn decode(bytes: &HeaderBytes) -> Result<Self, CastError> {
        let x_pos = bytes
            .iter()
            .position(|&b| b == b'x')
            .ok_or(CastError::MalformedHeader("missing 'x' delimiter"))?;
        let space_pos = bytes[x_pos..]
            .iter()
            .position(|&b| b == b' ')
            .map(|p| p + x_pos)
            .ok_or(CastError::MalformedHeader("missing ' ' delimiter"))?;
        let e_pos = bytes[space_pos..]
            .iter()
            .position(|&b| b == b'e')
            .map(|p| p + space_pos)
            .ok_or(CastError::MalformedHeader("missing 'e' terminator"))?;

        let width = parse_field(&bytes[..x_pos], "width field is not a number")?;
        let height = parse_field(&bytes[x_pos + 1..space_pos], "height field is not a number")?;
        let payload_bytes = parse_field(
            &bytes[space_pos + 1..e_pos],
            "payload length field is not a number",
        )?;

        let width =
            u32::try_from(width).map_err(|_| CastError::MalformedHeader("width exceeds u32"))?;
        let height =
            u32::try_from(height).map_err(|_| CastError::MalformedHeader("height exceeds u32"))?;

        Ok(Self {
            width,
            height,
            payload_bytes,
        })
    }
}

/// Parse a decimal field between two delimiters.
fn parse_field(bytes: &[u8], what: &'static str) -> Result<u64, CastError> {
    if bytes.is_empty() || !bytes.iter().all(|b| b.is_ascii_digit()) {
        return Err(CastError::MalformedHeader(what));
    }
    // All-digit and non-empty, so from_utf8 cannot fail; parse can
    // still overflow u64.
    std::str::from_utf8(bytes)
        .map_err(|_| CastError::MalformedHeader(what))?
        .parse::<u64>()
        .map_err(|_| CastError::MalformedHeader(what))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_exactly_64_bytes() {
        let hdr = FrameHeader::new(1920, 1080, 45000);
        let bytes = hdr.encode().unwrap();
        assert_eq!(bytes.len(), HEADER_LEN);
    }

    #[test]
    fn encode_matches_documented_layout() {
        let hdr = FrameHeader::new(1920, 1080, 45000);
        let bytes = hdr.encode().unwrap();
        assert!(bytes.starts_with(b"1920x1080 45000e"));
        assert!(bytes[16..].iter().all(|&b| b == b'0'));
    }

    #[test]
    fn decode_documented_example() {
        let mut bytes: HeaderBytes = [b'0'; HEADER_LEN];
        bytes[..16].copy_from_slice(b"1920x1080 45000e");
        let hdr = FrameHeader::decode(&bytes).unwrap();
        assert_eq!(hdr.width(), 1920);
        assert_eq!(hdr.height(), 1080);
        assert_eq!(hdr.payload_bytes(), 45000);
    }

    #[test]
    fn roundtrip_various_values() {
        for &(w, h, p) in &[
            (1u32, 1u32, 0u64),
            (640, 480, 1),
            (1920, 1080, 45000),
            (3840, 2160, u32::MAX as u64),
            (u32::MAX, u32::MAX, u64::MAX / 10),
        ] {
            let hdr = FrameHeader::new(w, h, p);
            let bytes = hdr.encode().unwrap();
            let back = FrameHeader::decode(&bytes).unwrap();
            assert_eq!(back, hdr, "roundtrip failed for {w}x{h} {p}");
        }
    }

    #[test]
    fn input_batch_header_has_zero_dimensions() {
        let hdr = FrameHeader::new(0, 0, 24);
        let bytes = hdr.encode().unwrap();
        assert!(bytes.starts_with(b"0x0 24e"));
        let back = FrameHeader::decode(&bytes).unwrap();
        assert_eq!(back.width(), 0);
        assert_eq!(back.height(), 0);
        assert_eq!(back.payload_bytes(), 24);
    }

    #[test]
    fn worst_case_header_text_fits_slot() {
        // "4294967295x4294967295 18446744073709551615e" is 43 bytes,
        // so in-range fields can never trip the overflow guard. The
        // guard stays as a hard stop for any future format change.
        let hdr = FrameHeader::new(u32::MAX, u32::MAX, u64::MAX);
        let bytes = hdr.encode().unwrap();
        let back = FrameHeader::decode(&bytes).unwrap();
        assert_eq!(back.payload_bytes(), u64::MAX);
    }

    #[test]
    fn missing_e_terminator_is_malformed() {
        let mut bytes: HeaderBytes = [b'0'; HEADER_LEN];
        // '0' padding supplies digits after the space but never an 'e'.
        bytes[..14].copy_from_slice(b"1920x1080 4500");
        let err = FrameHeader::decode(&bytes).unwrap_err();
        assert!(matches!(err, CastError::MalformedHeader(_)));
    }

    #[test]
    fn missing_x_delimiter_is_malformed() {
        let bytes: HeaderBytes = [b'0'; HEADER_LEN];
        let err = FrameHeader::decode(&bytes).unwrap_err();
        assert!(matches!(err, CastError::MalformedHeader(_)));
    }

    #[test]
    fn missing_space_is_malformed() {
        let mut bytes: HeaderBytes = [b'0'; HEADER_LEN];
        bytes[..15].copy_from_slice(b"1920x108045000e");
        let err = FrameHeader::decode(&bytes).unwrap_err();
        assert!(matches!(err, CastError::MalformedHeader(_)));
    }

    #[test]
    fn non_numeric_field_is_malformed() {
        let mut bytes: HeaderBytes = [b'0'; HEADER_LEN];
        bytes[..16].copy_from_slice(b"19a0x1080 45000e");
        let err = FrameHeader::decode(&bytes).unwrap_err();
        assert!(matches!(err, CastError::MalformedHeader(_)));
    }

    #[test]
    fn empty_width_field_is_malformed() {
        let mut bytes: HeaderBytes = [b'0'; HEADER_LEN];
        bytes[..12].copy_from_slice(b"x1080 45000e");
        let err = FrameHeader::decode(&bytes).unwrap_err();
        assert!(matches!(err, CastError::MalformedHeader(_)));
    }

    #[test]
    fn width_beyond_u32_is_malformed() {
        let mut bytes: HeaderBytes = [b'0'; HEADER_LEN];
        bytes[..19].copy_from_slice(b"99999999999x1 1000e");
        let err = FrameHeader::decode(&bytes).unwrap_err();
        assert!(matches!(err, CastError::MalformedHeader(_)));
    }
}
