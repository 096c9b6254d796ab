use bytes::{Buf, BufMut, BytesMut};

use crate::error::{FrameError, Result};

/// Frame size: marker (1) + channel (1) + value (2) = 4 bytes.
pub const FRAME_SIZE: usize = 4;

/// Frame-start marker byte (0xB5).
pub const MARKER: u8 = 181;

/// Offset added to a signed channel value before reduction.
pub const OFFSET: i64 = 1024;

/// Modulus applied to the offset value; wire values lie in `0..MODULUS`.
pub const MODULUS: i64 = 2049;

/// Reduce a signed channel value to its wire representation.
///
/// Values outside `-1024..=1024` wrap around instead of clamping.
pub fn wire_value(value: i64) -> u16 {
    // Widened so the offset cannot overflow at the ends of the i64 range.
    (i128::from(value) + i128::from(OFFSET)).rem_euclid(i128::from(MODULUS)) as u16
}

/// Reduce a fractional channel value to its wire representation.
///
/// The offset value is truncated toward zero before reduction. Non-finite
/// inputs have no meaningful encoding (NaN lands on wire 0, which is
/// `-OFFSET`) and should be rejected by the caller.
pub fn wire_value_f64(value: f64) -> u16 {
    let offset = (value + OFFSET as f64).trunc() as i64;
    offset.rem_euclid(MODULUS) as u16
}

/// A single channel update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// The channel byte.
    pub channel: u8,
    /// The reduced value, `0..=2048`.
    pub wire: u16,
}

impl Frame {
    /// Create a frame for a signed channel value.
    ///
    /// Only the low 8 bits of `channel` are kept.
    pub fn new(channel: usize, value: i64) -> Self {
        Self {
            channel: (channel & 0xFF) as u8,
            wire: wire_value(value),
        }
    }

    /// Create a frame for a fractional channel value.
    pub fn from_f64(channel: usize, value: f64) -> Self {
        Self {
            channel: (channel & 0xFF) as u8,
            wire: wire_value_f64(value),
        }
    }

    /// The signed channel value this frame carries.
    pub fn value(&self) -> i32 {
        i32::from(self.wire) - OFFSET as i32
    }

    /// The frame's wire bytes.
    pub fn to_bytes(&self) -> [u8; FRAME_SIZE] {
        [
            MARKER,
            self.channel,
            ((self.wire >> 8) & 0xFF) as u8,
            (self.wire & 0xFF) as u8,
        ]
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────┬──────────┬──────────────┬─────────────┐
/// │ Marker   │ Channel  │ Value high   │ Value low   │
/// │ 0xB5     │ (1B)     │ (wire >> 8)  │ (wire & FF) │
/// └──────────┴──────────┴──────────────┴─────────────┘
/// ```
pub fn encode_frame(frame: &Frame, dst: &mut BytesMut) {
    dst.reserve(FRAME_SIZE);
    dst.put_slice(&frame.to_bytes());
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer. On a bad marker
/// nothing is consumed.
pub fn decode_frame(src: &mut BytesMut) -> Result<Option<Frame>> {
    if src.len() < FRAME_SIZE {
        return Ok(None);
    }

    if src[0] != MARKER {
        return Err(FrameError::InvalidMarker(src[0]));
    }

    let wire = u16::from_be_bytes([src[2], src[3]]);
    if i64::from(wire) >= MODULUS {
        return Err(FrameError::ValueOutOfRange(wire));
    }

    let channel = src[1];
    src.advance(FRAME_SIZE);
    Ok(Some(Frame { channel, wire }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_known_frame() {
        // 64 + 1024 = 1088 = 0x0440
        assert_eq!(Frame::new(0, 64).to_bytes(), [181, 0, 4, 64]);
        assert_eq!(Frame::new(3, -1024).to_bytes(), [181, 3, 0, 0]);
        assert_eq!(Frame::new(15, 1024).to_bytes(), [181, 15, 8, 0]);
    }

    #[test]
    fn nominal_range_roundtrips() {
        for value in -1024i64..=1024 {
            let mut buf = BytesMut::new();
            encode_frame(&Frame::new(5, value), &mut buf);

            let frame = decode_frame(&mut buf).unwrap().unwrap();
            assert_eq!(i64::from(frame.value()), value);
            assert_eq!(frame.channel, 5);
            assert!(buf.is_empty());
        }
    }

    #[test]
    fn out_of_range_values_wrap() {
        for value in [-5000i64, -1025, 1025, 2049, 4096, 123_456] {
            let reduced = (value + OFFSET).rem_euclid(MODULUS) - OFFSET;
            assert_eq!(Frame::new(1, value), Frame::new(1, reduced));
            assert!(Frame::new(1, value).wire <= 2048);
        }
        assert_eq!(Frame::new(1, 1025).value(), -1024);
        assert_eq!(Frame::new(1, -1025).value(), 1024);
    }

    #[test]
    fn extreme_values_do_not_panic() {
        assert_eq!(Frame::new(0, i64::MAX).wire, 767);
        assert_eq!(Frame::new(0, i64::MIN).wire, 1280);
        assert!(Frame::from_f64(0, f64::INFINITY).wire <= 2048);
        assert_eq!(Frame::from_f64(0, f64::NAN).wire, 0);
    }

    #[test]
    fn fractional_values_truncate_after_offset() {
        assert_eq!(Frame::from_f64(2, 64.9), Frame::new(2, 64));
        assert_eq!(Frame::from_f64(2, -0.5).wire, 1023);
        assert_eq!(Frame::from_f64(2, -1024.5).wire, 0);
    }

    #[test]
    fn channel_byte_is_masked() {
        assert_eq!(Frame::new(0x1_05, 0).channel, 5);
    }

    #[test]
    fn decode_incomplete_frame() {
        let mut buf = BytesMut::from(&[MARKER, 0x00, 0x04][..]);
        assert!(decode_frame(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn decode_invalid_marker() {
        let mut buf = BytesMut::from(&[0xFF, 0x00, 0x04, 0x40][..]);
        let result = decode_frame(&mut buf);
        assert!(matches!(result, Err(FrameError::InvalidMarker(0xFF))));
        assert_eq!(buf.len(), FRAME_SIZE);
    }

    #[test]
    fn decode_value_out_of_range() {
        let mut buf = BytesMut::from(&[MARKER, 0x00, 0x08, 0x01][..]);
        let result = decode_frame(&mut buf);
        assert!(matches!(result, Err(FrameError::ValueOutOfRange(2049))));
    }

    #[test]
    fn multiple_frames() {
        let mut buf = BytesMut::new();
        encode_frame(&Frame::new(0, 10), &mut buf);
        encode_frame(&Frame::new(1, 20), &mut buf);

        let f1 = decode_frame(&mut buf).unwrap().unwrap();
        let f2 = decode_frame(&mut buf).unwrap().unwrap();
        assert_eq!((f1.channel, f1.value()), (0, 10));
        assert_eq!((f2.channel, f2.value()), (1, 20));
        assert!(buf.is_empty());
    }
}
