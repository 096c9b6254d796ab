use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Subcommand};
use txctl_transport::DEFAULT_BAUD_RATE;

use crate::exit::{CliError, CliResult, INTERNAL, USAGE};
use crate::output::OutputFormat;

pub mod monitor;
pub mod ports;
pub mod repl;
pub mod send;
pub mod track;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send one channel value and exit.
    Send(SendArgs),
    /// Read commands from stdin and drive the transmitter.
    Repl(ReplArgs),
    /// Turn head-tracker orientation samples into channel commands.
    Track(TrackArgs),
    /// Decode frames from a serial device or capture file.
    Monitor(MonitorArgs),
    /// List serial ports on this host.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args, format),
        Command::Repl(args) => repl::run(args),
        Command::Track(args) => track::run(args),
        Command::Monitor(args) => monitor::run(args, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Serial device of the transmitter.
    pub device: String,
    /// `VALUE`, `CHANNEL VALUE`, or `BAUD CHANNEL VALUE`.
    #[arg(
        required = true,
        num_args = 1..=3,
        allow_negative_numbers = true,
        value_name = "ARGS"
    )]
    pub values: Vec<String>,
    /// Link speed (cannot be combined with the three-argument form).
    #[arg(long, short = 'b')]
    pub baud: Option<u32>,
    /// Log the transmitted update.
    #[arg(long)]
    pub debug: bool,
}

#[derive(Args, Debug)]
pub struct ReplArgs {
    /// Serial device of the transmitter.
    pub device: String,
    /// Link speed.
    #[arg(long, short = 'b', default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
    /// Log every transmitted update.
    #[arg(long)]
    pub debug: bool,
}

#[derive(Args, Debug)]
pub struct TrackArgs {
    /// Orientation sample source (`-` for stdin).
    #[arg(long, short = 'i', default_value = "-")]
    pub input: PathBuf,
    /// Channel driven by the horizontal axis.
    #[arg(long, default_value_t = 4)]
    pub x_channel: u8,
    /// Channel driven by the vertical axis.
    #[arg(long, default_value_t = 5)]
    pub y_channel: u8,
    /// Rotation component (0-3) feeding the horizontal axis.
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..4))]
    pub x_component: u8,
    /// Rotation component (0-3) feeding the vertical axis.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..4))]
    pub y_component: u8,
    /// Channel value for a unit rotation component.
    #[arg(long, default_value_t = 1024.0)]
    pub scale: f64,
    /// Delay between samples (e.g. 50ms, 1s).
    #[arg(long, default_value = "50ms")]
    pub interval: String,
    /// Exit after N samples.
    #[arg(long)]
    pub count: Option<u64>,
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Serial device or capture file to read.
    pub path: PathBuf,
    /// Link speed when `path` is a serial device.
    #[arg(long, short = 'b', default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
    /// Exit after receiving N frames.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse `500ms`, `2s` or a bare number of seconds.
pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if millis {
        Ok(Duration::from_millis(value))
    } else {
        Ok(Duration::from_secs(value))
    }
}

/// Flag cleared by Ctrl-C.
pub fn install_ctrlc_handler() -> CliResult<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        flag.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))?;
    Ok(running)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("50ms").unwrap(), Duration::from_millis(50));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
        assert_eq!(parse_duration("0ms").unwrap(), Duration::ZERO);
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("-5ms").is_err());
    }
}
