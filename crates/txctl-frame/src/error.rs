/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame does not start with the marker byte.
    #[error("invalid frame marker 0x{0:02X} (expected 0xB5)")]
    InvalidMarker(u8),

    /// The decoded wire value is outside `0..=2048`.
    #[error("wire value {0} out of range (max 2048)")]
    ValueOutOfRange(u16),

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link was closed before a complete frame was transferred.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
