use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};
use tracing::debug;

use crate::codec::{decode_frame, Frame, MARKER};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 256;
const READ_CHUNK_SIZE: usize = 64;

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads internally and resynchronizes on the marker byte:
/// bytes that cannot start a valid frame are discarded and counted.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    skipped: u64,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            skipped: 0,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached.
    pub fn read_frame(&mut self) -> Result<Frame> {
        loop {
            match decode_frame(&mut self.buf) {
                Ok(Some(frame)) => return Ok(frame),
                Ok(None) => {}
                Err(FrameError::InvalidMarker(_)) | Err(FrameError::ValueOutOfRange(_)) => {
                    self.resync();
                    continue;
                }
                Err(err) => return Err(err),
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Drop the leading byte and everything up to the next marker.
    fn resync(&mut self) {
        let drop = self.buf[1..]
            .iter()
            .position(|&b| b == MARKER)
            .map(|pos| pos + 1)
            .unwrap_or(self.buf.len());
        self.buf.advance(drop);
        self.skipped += drop as u64;
        debug!(dropped = drop, "resynchronizing on frame marker");
    }

    /// Number of bytes discarded while resynchronizing.
    pub fn skipped_bytes(&self) -> u64 {
        self.skipped
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read> Iterator for FrameReader<T> {
    type Item = Result<Frame>;

    /// Yields frames until the stream ends; EOF ends iteration.
    fn next(&mut self) -> Option<Self::Item> {
        match self.read_frame() {
            Ok(frame) => Some(Ok(frame)),
            Err(FrameError::ConnectionClosed) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn read_single_frame() {
        let mut reader = FrameReader::new(Cursor::new(vec![181u8, 0, 4, 64]));
        let frame = reader.read_frame().unwrap();

        assert_eq!(frame.channel, 0);
        assert_eq!(frame.value(), 64);
        assert_eq!(reader.skipped_bytes(), 0);
    }

    #[test]
    fn read_multiple_frames() {
        let wire = [
            Frame::new(0, 10).to_bytes(),
            Frame::new(1, 20).to_bytes(),
            Frame::new(3, 99).to_bytes(),
        ]
        .concat();

        let frames: Vec<Frame> = FrameReader::new(Cursor::new(wire))
            .collect::<Result<_>>()
            .unwrap();

        let pairs: Vec<(u8, i32)> = frames.iter().map(|f| (f.channel, f.value())).collect();
        assert_eq!(pairs, vec![(0, 10), (1, 20), (3, 99)]);
    }

    #[test]
    fn resynchronizes_after_garbage() {
        let mut wire = vec![0x00, 0x13, 0x37];
        wire.extend_from_slice(&Frame::new(7, -300).to_bytes());

        let mut reader = FrameReader::new(Cursor::new(wire));
        let frame = reader.read_frame().unwrap();

        assert_eq!((frame.channel, frame.value()), (7, -300));
        assert_eq!(reader.skipped_bytes(), 3);
    }

    #[test]
    fn resynchronizes_after_bad_value() {
        // Marker followed by an impossible value, then a real frame.
        let mut wire = vec![181, 2, 0xFF, 0xFF];
        wire.extend_from_slice(&Frame::new(2, 0).to_bytes());

        let mut reader = FrameReader::new(Cursor::new(wire));
        let frame = reader.read_frame().unwrap();

        assert_eq!((frame.channel, frame.value()), (2, 0));
        assert_eq!(reader.skipped_bytes(), 4);
    }

    #[test]
    fn partial_read_handling() {
        let byte_reader = ByteByByteReader {
            bytes: Frame::new(4, 512).to_bytes().to_vec(),
            pos: 0,
        };
        let mut reader = FrameReader::new(byte_reader);

        let frame = reader.read_frame().unwrap();
        assert_eq!((frame.channel, frame.value()), (4, 512));
    }

    #[test]
    fn connection_closed_cleanly() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn connection_closed_mid_frame() {
        let mut reader = FrameReader::new(Cursor::new(vec![181u8, 0]));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }
}
