use std::io::Write;

use tracing::{debug, info};
use txctl_frame::channel::index;
use txctl_frame::{Frame, FrameWriter, CHANNEL_COUNT};

use crate::error::{ControlError, Result};

/// Controller configuration.
#[derive(Debug, Clone, Default)]
pub struct ControllerConfig {
    /// Log every transmitted update as `Sent <value> to channel <channel>`.
    pub debug: bool,
}

/// What `set_channel` did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// A frame was transmitted.
    Sent,
    /// The channel already holds this value; nothing was transmitted.
    Unchanged,
    /// The channel index is outside the table; the request was ignored.
    OutOfRange,
}

/// Owns the link to the transmitter and the last value sent per channel.
///
/// The link is released exactly once, by [`close`](Self::close) or on drop.
pub struct ChannelController<W: Write> {
    writer: Option<FrameWriter<W>>,
    channels: [Option<i64>; CHANNEL_COUNT],
    config: ControllerConfig,
}

impl<W: Write> ChannelController<W> {
    /// Wrap an open link with default configuration.
    pub fn new(link: W) -> Self {
        Self::with_config(link, ControllerConfig::default())
    }

    /// Wrap an open link with explicit configuration.
    pub fn with_config(link: W, config: ControllerConfig) -> Self {
        Self {
            writer: Some(FrameWriter::new(link)),
            channels: [None; CHANNEL_COUNT],
            config,
        }
    }

    /// Set a channel, transmitting only if its value changed.
    ///
    /// Channels outside `0..16` are ignored without error.
    pub fn set_channel(&mut self, channel: i64, value: i64) -> Result<SetOutcome> {
        let Some(idx) = index(channel) else {
            debug!(channel, value, "ignoring out-of-range channel");
            return Ok(SetOutcome::OutOfRange);
        };

        if self.channels[idx] == Some(value) {
            return Ok(SetOutcome::Unchanged);
        }

        self.send_channel(idx, value)?;
        Ok(SetOutcome::Sent)
    }

    /// Transmit a channel value unconditionally and record it.
    pub fn send_channel(&mut self, channel: usize, value: i64) -> Result<()> {
        check_index(channel)?;
        self.transmit(Frame::new(channel, value))?;
        self.channels[channel] = Some(value);
        self.report(channel, value);
        Ok(())
    }

    /// Transmit a fractional channel value unconditionally.
    ///
    /// The table records the value truncated toward zero.
    pub fn send_channel_f64(&mut self, channel: usize, value: f64) -> Result<()> {
        check_index(channel)?;
        self.transmit(Frame::from_f64(channel, value))?;
        let recorded = value.trunc() as i64;
        self.channels[channel] = Some(recorded);
        self.report(channel, recorded);
        Ok(())
    }

    fn transmit(&mut self, frame: Frame) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(ControlError::Closed)?;
        writer.write_frame(&frame)?;
        Ok(())
    }

    fn report(&self, channel: usize, value: i64) {
        if self.config.debug {
            info!("Sent {value} to channel {channel}");
        } else {
            debug!(channel, value, "sent channel update");
        }
    }

    /// Last value sent on `channel`, or `None` if unset or out of range.
    pub fn channel(&self, channel: usize) -> Option<i64> {
        self.channels.get(channel).copied().flatten()
    }

    /// The full channel table.
    pub fn channels(&self) -> &[Option<i64>; CHANNEL_COUNT] {
        &self.channels
    }

    /// Number of frames transmitted since the link was opened.
    pub fn frames_sent(&self) -> u64 {
        self.writer.as_ref().map_or(0, FrameWriter::frames_written)
    }

    /// Borrow the link, unless it has been closed.
    pub fn link(&self) -> Option<&W> {
        self.writer.as_ref().map(FrameWriter::get_ref)
    }

    /// Enable or disable per-send reporting.
    pub fn set_debug(&mut self, debug: bool) {
        self.config.debug = debug;
    }

    /// Returns true once the link has been released.
    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }

    /// Flush and release the link. Later calls are no-ops.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            let flushed = writer.flush();
            drop(writer);
            debug!("controller link closed");
            flushed?;
        }
        Ok(())
    }
}

fn check_index(channel: usize) -> Result<()> {
    if channel >= CHANNEL_COUNT {
        return Err(ControlError::InvalidChannel(channel));
    }
    Ok(())
}

impl<W: Write> Drop for ChannelController<W> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl<W: Write> std::fmt::Debug for ChannelController<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelController")
            .field("closed", &self.is_closed())
            .field("channels", &self.channels)
            .field("debug", &self.config.debug)
            .finish()
    }
}
