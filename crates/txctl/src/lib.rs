//! Drive RC transmitter channels over a serial link.
//!
//! txctl encodes `(channel, value)` updates as 4-byte frames and writes them
//! to the transmitter's serial input, with a text command loop on top.
//!
//! # Crate Structure
//!
//! - [`transport`] — Serial link (8-N-1 ports, capture files)
//! - [`frame`] — Four-byte channel/value framing
//! - [`control`] — Channel controller, command loop, head-tracking sampler

/// Re-export transport types.
pub mod transport {
    pub use txctl_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use txctl_frame::*;
}

/// Re-export control types.
pub mod control {
    pub use txctl_control::*;
}
