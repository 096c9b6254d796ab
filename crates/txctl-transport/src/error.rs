use std::path::PathBuf;

/// Errors that can occur while opening or using a serial link.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The serial device could not be opened at the requested rate.
    #[error("failed to open {device} at {baud} baud: {source}")]
    Open {
        device: String,
        baud: u32,
        source: serialport::Error,
    },

    /// A capture file or FIFO could not be opened.
    #[error("failed to open {path}: {source}")]
    OpenFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Serial port enumeration failed.
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(serialport::Error),

    /// An I/O error occurred on the link.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// The underlying I/O error kind, when there is one.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            TransportError::Open { source, .. } | TransportError::Enumerate(source) => {
                match source.kind() {
                    serialport::ErrorKind::Io(kind) => Some(kind),
                    serialport::ErrorKind::NoDevice => Some(std::io::ErrorKind::NotFound),
                    _ => None,
                }
            }
            TransportError::OpenFile { source, .. } | TransportError::Io(source) => {
                Some(source.kind())
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
