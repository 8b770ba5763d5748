//! Input events and their fixed-size wire records.
//!
//! The viewer collects mouse/keyboard events each polling tick and
//! ships them as an [`InputBatch`]: an ordered run of fixed 8-byte
//! records framed exactly like a video frame (header width/height
//! zero, `payload_bytes = count × 8`).
//!
//! ## Record format (8 bytes, little-endian)
//!
//! ```text
//! Mouse:  tag=0  u8
//!         x      u16
//!         y      u16
//!         button u8   (0 left, 1 middle, 2 right, 3 wheel-up, 4 wheel-down)
//!         pad    [u8; 2]
//!
//! Key:    tag=1  u8
//!         mods   u8   (bitflags: ctrl|shift|alt|meta)
//!         key    u32  (Unicode scalar value)
//!         pad    [u8; 2]
//! ```

use bitflags::bitflags;
use bytes::Bytes;

use crate::error::CastError;

/// Wire size of one input event record.
pub const EVENT_RECORD_SIZE: usize = 8;

// ── MouseButton ──────────────────────────────────────────────────

/// Mouse button (or wheel step) carried by a mouse record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
}

impl MouseButton {
    fn to_wire(self) -> u8 {
        match self {
            MouseButton::Left => 0,
            MouseButton::Middle => 1,
            MouseButton::Right => 2,
            MouseButton::WheelUp => 3,
            MouseButton::WheelDown => 4,
        }
    }

    fn from_wire(value: u8) -> Result<Self, CastError> {
        match value {
            0 => Ok(MouseButton::Left),
            1 => Ok(MouseButton::Middle),
            2 => Ok(MouseButton::Right),
            3 => Ok(MouseButton::WheelUp),
            4 => Ok(MouseButton::WheelDown),
            other => Err(CastError::UnknownVariant {
                field: "mouse button",
                value: other as u32,
            }),
        }
    }
}

// ── KeyModifiers ─────────────────────────────────────────────────

bitflags! {
    /// Modifier keys held while a key event fired.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KeyModifiers: u8 {
        const CTRL  = 0b0001;
        const SHIFT = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

// ── InputEvent ───────────────────────────────────────────────────

/// One mouse or keyboard event, in the order the viewer observed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Mouse {
        x: u16,
        y: u16,
        button: MouseButton,
    },
    Key {
        modifiers: KeyModifiers,
        key: char,
    },
}

const TAG_MOUSE: u8 = 0;
const TAG_KEY: u8 = 1;

impl InputEvent {
    /// Pack into the fixed 8-byte wire record.
    pub fn encode(&self) -> [u8; EVENT_RECORD_SIZE] {
        let mut rec = [0u8; EVENT_RECORD_SIZE];
        match *self {
            InputEvent::Mouse { x, y, button } => {
                rec[0] = TAG_MOUSE;
                rec[1..3].copy_from_slice(&x.to_le_bytes());
                rec[3..5].copy_from_slice(&y.to_le_bytes());
                rec[5] = button.to_wire();
            }
            InputEvent::Key { modifiers, key } => {
                rec[0] = TAG_KEY;
                rec[1] = modifiers.bits();
                rec[2..6].copy_from_slice(&(key as u32).to_le_bytes());
            }
        }
        rec
    }

    /// Unpack one 8-byte wire record.
    pub fn decode(rec: &[u8; EVENT_RECORD_SIZE]) -> Result<Self, CastError> {
        match rec[0] {
            TAG_MOUSE => Ok(InputEvent::Mouse {
                x: u16::from_le_bytes([rec[1], rec[2]]),
                y: u16::from_le_bytes([rec[3], rec[4]]),
                button: MouseButton::from_wire(rec[5])?,
            }),
            TAG_KEY => {
                let modifiers = KeyModifiers::from_bits_truncate(rec[1]);
                let raw = u32::from_le_bytes([rec[2], rec[3], rec[4], rec[5]]);
                let key = char::from_u32(raw).ok_or(CastError::UnknownVariant {
                    field: "key",
                    value: raw,
                })?;
                Ok(InputEvent::Key { modifiers, key })
            }
            other => Err(CastError::UnknownVariant {
                field: "event tag",
                value: other as u32,
            }),
        }
    }
}

// ── InputBatch ───────────────────────────────────────────────────

/// An ordered sequence of events collected within one polling tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBatch {
    events: Vec<InputEvent>,
}

impl InputBatch {
    /// Wrap an ordered event list.
    pub fn new(events: Vec<InputEvent>) -> Self {
        Self { events }
    }

    /// Events in original order.
    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    /// Number of events in the batch.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the batch holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Pack all records into one payload (`len() × 8` bytes).
    pub fn encode(&self) -> Bytes {
        let mut out = Vec::with_capacity(self.events.len() * EVENT_RECORD_SIZE);
        for event in &self.events {
            out.extend_from_slice(&event.encode());
        }
        Bytes::from(out)
    }

    /// Reinterpret a payload as an ordered run of records.
    ///
    /// Fails with [`CastError::InvalidBatch`] when the payload length
    /// is not a whole number of records. An empty payload decodes to
    /// an empty batch.
    pub fn decode(payload: &[u8]) -> Result<Self, CastError> {
        if payload.len() % EVENT_RECORD_SIZE != 0 {
            return Err(CastError::InvalidBatch {
                len: payload.len(),
                record_size: EVENT_RECORD_SIZE,
            });
        }

        let mut events = Vec::with_capacity(payload.len() / EVENT_RECORD_SIZE);
        for chunk in payload.chunks_exact(EVENT_RECORD_SIZE) {
            let rec: &[u8; EVENT_RECORD_SIZE] = chunk.try_into().expect("chunks_exact");
            events.push(InputEvent::decode(rec)?);
        }
        Ok(Self { events })
    }
}

impl IntoIterator for InputBatch {
    type Item = InputEvent;
    type IntoIter = std::vec::IntoIter<InputEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_record_roundtrip() {
        let ev = InputEvent::Mouse {
            x: 1024,
            y: 768,
            button: MouseButton::Right,
        };
        let rec = ev.encode();
        assert_eq!(rec.len(), EVENT_RECORD_SIZE);
        assert_eq!(InputEvent::decode(&rec).unwrap(), ev);
    }

    #[test]
    fn key_record_roundtrip() {
        let ev = InputEvent::Key {
            modifiers: KeyModifiers::CTRL | KeyModifiers::SHIFT,
            key: 'ß',
        };
        let rec = ev.encode();
        assert_eq!(InputEvent::decode(&rec).unwrap(), ev);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let mut rec = [0u8; EVENT_RECORD_SIZE];
        rec[0] = 9;
        let err = InputEvent::decode(&rec).unwrap_err();
        assert!(matches!(err, CastError::UnknownVariant { .. }));
    }

    #[test]
    fn unknown_button_is_rejected() {
        let mut rec = InputEvent::Mouse {
            x: 0,
            y: 0,
            button: MouseButton::Left,
        }
        .encode();
        rec[5] = 0xFF;
        let err = InputEvent::decode(&rec).unwrap_err();
        assert!(matches!(err, CastError::UnknownVariant { .. }));
    }

    #[test]
    fn surrogate_key_value_is_rejected() {
        let mut rec = [0u8; EVENT_RECORD_SIZE];
        rec[0] = 1;
        rec[2..6].copy_from_slice(&0xD800u32.to_le_bytes()); // not a scalar value
        let err = InputEvent::decode(&rec).unwrap_err();
        assert!(matches!(err, CastError::UnknownVariant { .. }));
    }

    #[test]
    fn batch_payload_is_count_times_record_size() {
        let batch = InputBatch::new(vec![
            InputEvent::Key {
                modifiers: KeyModifiers::empty(),
                key: 'a',
            },
            InputEvent::Key {
                modifiers: KeyModifiers::empty(),
                key: 'b',
            },
            InputEvent::Key {
                modifiers: KeyModifiers::SHIFT,
                key: 'C',
            },
        ]);
        let payload = batch.encode();
        assert_eq!(payload.len(), 3 * EVENT_RECORD_SIZE);

        let back = InputBatch::decode(&payload).unwrap();
        assert_eq!(back, batch);
    }

    #[test]
    fn batch_preserves_order() {
        let events = vec![
            InputEvent::Mouse {
                x: 1,
                y: 1,
                button: MouseButton::Left,
            },
            InputEvent::Key {
                modifiers: KeyModifiers::empty(),
                key: 'x',
            },
            InputEvent::Mouse {
                x: 2,
                y: 2,
                button: MouseButton::WheelDown,
            },
        ];
        let batch = InputBatch::new(events.clone());
        let back = InputBatch::decode(&batch.encode()).unwrap();
        assert_eq!(back.events(), &events[..]);
    }

    #[test]
    fn ragged_payload_is_invalid() {
        let err = InputBatch::decode(&[0u8; 13]).unwrap_err();
        assert!(matches!(err, CastError::InvalidBatch { .. }));
    }

    #[test]
    fn empty_payload_is_empty_batch() {
        let batch = InputBatch::decode(&[]).unwrap();
        assert!(batch.is_empty());
    }
}
