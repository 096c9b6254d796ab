//! Channel index space of the transmitter.
//!
//! The serial input exposes 16 channels, addressed 0-15 on the wire.

/// Number of channels the transmitter accepts.
pub const CHANNEL_COUNT: usize = 16;

/// Lowest nominal channel value (full deflection one way).
pub const VALUE_MIN: i32 = -1024;

/// Highest nominal channel value (full deflection the other way).
pub const VALUE_MAX: i32 = 1024;

/// Returns the table index for `channel` if it addresses a real channel.
pub fn index(channel: i64) -> Option<usize> {
    usize::try_from(channel)
        .ok()
        .filter(|&idx| idx < CHANNEL_COUNT)
}

/// Returns true if `channel` addresses a real channel.
pub fn is_valid(channel: i64) -> bool {
    index(channel).is_some()
}
