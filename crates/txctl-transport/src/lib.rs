//! Serial link transport for txctl.
//!
//! Opens the byte-oriented link the transmitter listens on:
//! - Serial devices (8-N-1, configurable baud rate)
//! - Plain files (captures, FIFOs, pseudo terminals opened as files)
//!
//! This is the lowest layer of txctl. Everything else builds on top of
//! the [`SerialStream`] type provided here.

pub mod error;
pub mod serial;
pub mod stream;

pub use error::{Result, TransportError};
pub use serial::{available_ports, LinkConfig, PortSummary, SerialLink, DEFAULT_BAUD_RATE};
pub use stream::SerialStream;
