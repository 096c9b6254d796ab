use std::fmt;
use std::io;

use txctl_control::ControlError;
use txctl_frame::FrameError;
use txctl_transport::TransportError;

// Exit codes follow sysexits-style groupings.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

fn code_for_kind(kind: io::ErrorKind) -> i32 {
    match kind {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound | io::ErrorKind::BrokenPipe => FAILURE,
        _ => INTERNAL,
    }
}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    CliError::new(code_for_kind(err.kind()), format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    let code = match &err {
        TransportError::Open { .. } | TransportError::Enumerate(_) => match err.io_kind() {
            Some(io::ErrorKind::PermissionDenied) => PERMISSION_DENIED,
            _ => TRANSPORT_ERROR,
        },
        other => other.io_kind().map_or(INTERNAL, code_for_kind),
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::InvalidMarker(_) | FrameError::ValueOutOfRange(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        FrameError::ConnectionClosed => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

pub fn control_error(context: &str, err: ControlError) -> CliError {
    match err {
        ControlError::Transport(err) => transport_error(context, err),
        ControlError::Frame(err) => frame_error(context, err),
        ControlError::Io(err) => io_error(context, err),
        ControlError::InvalidChannel(_) => CliError::usage(format!("{context}: {err}")),
        ControlError::InvalidSample { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        ControlError::Closed => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}
