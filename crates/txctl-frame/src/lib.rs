//! Four-byte channel/value framing for the transmitter's serial input.
//!
//! Every channel update is framed as:
//! - A 1-byte marker (181) for stream synchronization
//! - A 1-byte channel index
//! - A 2-byte big-endian wire value, `(value + 1024) mod 2049`
//!
//! No acknowledgements, no length prefix: the receiver resynchronizes on the
//! marker byte.

pub mod channel;
pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use channel::{is_valid, CHANNEL_COUNT, VALUE_MAX, VALUE_MIN};
pub use codec::{
    decode_frame, encode_frame, wire_value, wire_value_f64, Frame, FRAME_SIZE, MARKER, MODULUS,
    OFFSET,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
