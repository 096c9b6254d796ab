use std::io::{Read, Write};
use std::time::Duration;

use crate::error::Result;

/// An open link to the transmitter. Implements `Read` and `Write`.
///
/// This is the fundamental I/O type returned by transport operations.
/// It wraps either a configured serial port or a plain file handle.
pub struct SerialStream {
    inner: SerialStreamInner,
}

enum SerialStreamInner {
    Port(Box<dyn serialport::SerialPort>),
    File(std::fs::File),
}

impl Read for SerialStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            SerialStreamInner::Port(port) => port.read(buf),
            SerialStreamInner::File(file) => file.read(buf),
        }
    }
}

impl Write for SerialStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            SerialStreamInner::Port(port) => port.write(buf),
            SerialStreamInner::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            SerialStreamInner::Port(port) => port.flush(),
            SerialStreamInner::File(file) => file.flush(),
        }
    }
}

impl SerialStream {
    pub(crate) fn from_port(port: Box<dyn serialport::SerialPort>) -> Self {
        Self {
            inner: SerialStreamInner::Port(port),
        }
    }

    pub(crate) fn from_file(file: std::fs::File) -> Self {
        Self {
            inner: SerialStreamInner::File(file),
        }
    }

    /// Set the read/write timeout of the underlying port.
    ///
    /// Files have no timeout; the call is a no-op for them.
    pub fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        match &mut self.inner {
            SerialStreamInner::Port(port) => port
                .set_timeout(timeout)
                .map_err(|err| std::io::Error::from(err).into()),
            SerialStreamInner::File(_) => Ok(()),
        }
    }

    /// Baud rate of the link, or `None` for file-backed links.
    pub fn baud_rate(&self) -> Option<u32> {
        match &self.inner {
            SerialStreamInner::Port(port) => port.baud_rate().ok(),
            SerialStreamInner::File(_) => None,
        }
    }

    /// Device name reported by the port, if any.
    pub fn name(&self) -> Option<String> {
        match &self.inner {
            SerialStreamInner::Port(port) => port.name(),
            SerialStreamInner::File(_) => None,
        }
    }
}

impl std::fmt::Debug for SerialStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            SerialStreamInner::Port(port) => f
                .debug_struct("SerialStream")
                .field("type", &"serial")
                .field("name", &port.name())
                .finish(),
            SerialStreamInner::File(_) => f
                .debug_struct("SerialStream")
                .field("type", &"file")
                .finish(),
        }
    }
}
