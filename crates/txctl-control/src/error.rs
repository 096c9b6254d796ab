/// Errors that can occur in controller operations.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    /// Transport-level error (opening the link).
    #[error("transport error: {0}")]
    Transport(#[from] txctl_transport::TransportError),

    /// Frame-level error (writing to the link).
    #[error("frame error: {0}")]
    Frame(#[from] txctl_frame::FrameError),

    /// I/O error on the command input or output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A direct send addressed a channel the transmitter does not have.
    #[error("channel {0} out of range (0-15)")]
    InvalidChannel(usize),

    /// The link was closed by a previous teardown.
    #[error("controller link already closed")]
    Closed,

    /// An orientation sample could not be parsed.
    #[error("invalid orientation sample on line {line}: {reason}")]
    InvalidSample { line: u64, reason: String },
}

pub type Result<T> = std::result::Result<T, ControlError>;
