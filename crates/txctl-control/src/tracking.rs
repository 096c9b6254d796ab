//! Head-tracking sampler.
//!
//! Polls an orientation source and prints `so <channel> <value>` lines that
//! the command loop understands. The sampler never touches the serial link;
//! pipe its output into `txctl repl`.

use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{ControlError, Result};

/// One orientation sample: the rotation quaternion as the device reports it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub rotation: [f64; 4],
}

/// Something that can be polled for orientation samples.
pub trait OrientationSource {
    /// Block until the next sample. `Ok(None)` means the source is exhausted.
    fn poll(&mut self) -> Result<Option<Orientation>>;
}

/// Reads samples as text lines of four floats separated by whitespace or commas.
///
/// Blank lines and `#` comments are skipped.
pub struct LineOrientationSource<R> {
    reader: R,
    line: String,
    line_no: u64,
}

impl<R: BufRead> LineOrientationSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> OrientationSource for LineOrientationSource<R> {
    fn poll(&mut self) -> Result<Option<Orientation>> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let text = self.line.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            return parse_sample(text, self.line_no).map(Some);
        }
    }
}

fn parse_sample(text: &str, line: u64) -> Result<Orientation> {
    let fields: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .collect();
    if fields.len() != 4 {
        return Err(ControlError::InvalidSample {
            line,
            reason: format!("expected 4 components, found {}", fields.len()),
        });
    }

    let mut rotation = [0f64; 4];
    for (slot, field) in rotation.iter_mut().zip(&fields) {
        *slot = field.parse().map_err(|_| ControlError::InvalidSample {
            line,
            reason: format!("'{field}' is not a number"),
        })?;
    }
    Ok(Orientation { rotation })
}

/// Sampler configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Channel driven by the horizontal axis. Default: 4.
    pub x_channel: u8,
    /// Channel driven by the vertical axis. Default: 5.
    pub y_channel: u8,
    /// Rotation component feeding the horizontal axis. Default: 2.
    pub x_component: usize,
    /// Rotation component feeding the vertical axis. Default: 1.
    pub y_component: usize,
    /// Multiplier from a unit rotation component to a channel value. Default: 1024.
    pub scale: f64,
    /// Delay between samples. Default: 50 ms.
    pub interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            x_channel: 4,
            y_channel: 5,
            x_component: 2,
            y_component: 1,
            scale: 1024.0,
            interval: Duration::from_millis(50),
        }
    }
}

/// Scale a rotation component into a channel value, truncating toward zero.
pub fn axis_to_value(axis: f64, scale: f64) -> i64 {
    (axis * scale) as i64
}

/// Turns orientation samples into `setone` command lines.
pub struct HeadTracker<S, O> {
    source: S,
    out: O,
    config: TrackerConfig,
}

impl<S: OrientationSource, O: Write> HeadTracker<S, O> {
    pub fn new(source: S, out: O) -> Self {
        Self::with_config(source, out, TrackerConfig::default())
    }

    pub fn with_config(source: S, out: O, config: TrackerConfig) -> Self {
        Self {
            source,
            out,
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Poll once and emit the two command lines.
    ///
    /// Returns `false` when the source is exhausted.
    pub fn sample(&mut self) -> Result<bool> {
        let Some(orientation) = self.source.poll()? else {
            return Ok(false);
        };

        let cfg = &self.config;
        let x = axis_to_value(component(&orientation, cfg.x_component), cfg.scale);
        let y = axis_to_value(component(&orientation, cfg.y_component), cfg.scale);

        writeln!(self.out, "so {} {}", cfg.x_channel, x)?;
        writeln!(self.out, "so {} {}", cfg.y_channel, y)?;
        self.out.flush()?;
        Ok(true)
    }

    /// Sample at the configured interval until the source is exhausted,
    /// `running` is cleared, or `limit` samples have been emitted.
    ///
    /// Returns the number of samples emitted.
    pub fn run(&mut self, running: &AtomicBool, limit: Option<u64>) -> Result<u64> {
        let mut emitted = 0u64;
        while running.load(Ordering::SeqCst) {
            if !self.sample()? {
                debug!(emitted, "orientation source exhausted");
                break;
            }
            emitted += 1;

            if limit.is_some_and(|limit| emitted >= limit) {
                break;
            }
            if !self.config.interval.is_zero() {
                std::thread::sleep(self.config.interval);
            }
        }
        Ok(emitted)
    }

    /// Consume the tracker and return its output.
    pub fn into_output(self) -> O {
        self.out
    }
}

fn component(orientation: &Orientation, idx: usize) -> f64 {
    match orientation.rotation.get(idx) {
        Some(value) => *value,
        None => {
            warn!(component = idx, "rotation component out of range; using 0");
            0.0
        }
    }
}
