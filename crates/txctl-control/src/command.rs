//! Text commands accepted by the command loop.
//!
//! One command per line, tokens split on whitespace:
//!
//! ```text
//! exit | e
//! setone | so        CHANNEL# VALUE
//! setmultiple | sm   [VALUE | CHANNEL#:VALUE] ...
//! setpercent | sp    CHANNEL# PERCENT
//! ```

use txctl_frame::VALUE_MAX;

/// Usage line listing every command.
pub const GENERAL_USAGE: &str =
    "COMMAND (e | exit | so | setone | sm | setmultiple | sp | setpercent) [ARGUMENTS]";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Blank line.
    Empty,
    /// Leave the loop.
    Exit,
    /// Set a single channel.
    SetOne { channel: i64, value: i64 },
    /// Set a single channel from a percentage of full deflection.
    SetPercent { channel: i64, percent: f64 },
    /// Set several channels, in order.
    SetMultiple(Vec<Assignment>),
}

/// One effective `(channel, value)` pair of a `setmultiple` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub channel: i64,
    pub value: i64,
}

/// Why a command line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The first token is not a known command.
    #[error("unknown command '{command}'")]
    UnknownCommand { command: String },

    /// A known command was given too few arguments.
    #[error("missing arguments for '{command}'")]
    MissingArguments {
        command: String,
        usage: &'static str,
    },

    /// An argument is not a number of the expected kind.
    #[error("invalid number '{token}' in '{command}'")]
    InvalidNumber { command: String, token: String },
}

impl ParseError {
    /// The usage message to show the operator, if this error warrants one.
    ///
    /// Malformed numbers are dropped silently.
    pub fn usage(&self) -> Option<String> {
        match self {
            ParseError::UnknownCommand { command } => {
                Some(format!("Unknown command '{command}'. Usage: {GENERAL_USAGE}"))
            }
            ParseError::MissingArguments { command, usage } => {
                Some(format!("Usage: {command} {usage}"))
            }
            ParseError::InvalidNumber { .. } => None,
        }
    }
}

/// Convert a percentage of full deflection to a channel value.
///
/// `100` maps to `1024`; the result is truncated toward zero.
pub fn percent_to_value(percent: f64) -> i64 {
    (percent * f64::from(VALUE_MAX) / 100.0).trunc() as i64
}

/// Parse one line of operator input.
pub fn parse_line(line: &str) -> Result<Command, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = tokens.split_first() else {
        return Ok(Command::Empty);
    };

    match name {
        "exit" | "e" => Ok(Command::Exit),
        "setone" | "so" => {
            let [channel, value, ..] = args else {
                return Err(missing(name, "CHANNEL# VALUE"));
            };
            Ok(Command::SetOne {
                channel: number(name, channel)?,
                value: number(name, value)?,
            })
        }
        "setpercent" | "sp" => {
            let [channel, percent, ..] = args else {
                return Err(missing(name, "CHANNEL# PERCENT (-100 to 100)"));
            };
            let percent: f64 = number(name, percent)?;
            if !percent.is_finite() {
                return Err(invalid(name, args[1]));
            }
            Ok(Command::SetPercent {
                channel: number(name, channel)?,
                percent,
            })
        }
        "setmultiple" | "sm" => {
            if args.is_empty() {
                return Err(missing(name, "[VALUE | CHANNEL#:VALUE] ..."));
            }
            parse_assignments(name, args).map(Command::SetMultiple)
        }
        _ => Err(ParseError::UnknownCommand {
            command: name.to_string(),
        }),
    }
}

/// Resolve `setmultiple` tokens against a running channel counter.
///
/// A bare `VALUE` goes to the counter's channel; `CHANNEL#:VALUE` names its
/// channel explicitly. Either way the counter continues from the channel
/// just used.
fn parse_assignments(command: &str, tokens: &[&str]) -> Result<Vec<Assignment>, ParseError> {
    let mut next_channel: i64 = 0;
    let mut out = Vec::with_capacity(tokens.len());

    for token in tokens {
        let assignment = match token.split_once(':') {
            Some((channel, value)) => Assignment {
                channel: number(command, channel)?,
                value: number(command, value)?,
            },
            None => Assignment {
                channel: next_channel,
                value: number(command, token)?,
            },
        };
        next_channel = assignment.channel.saturating_add(1);
        out.push(assignment);
    }

    Ok(out)
}

fn number<T: std::str::FromStr>(command: &str, token: &str) -> Result<T, ParseError> {
    token.parse().map_err(|_| invalid(command, token))
}

fn invalid(command: &str, token: &str) -> ParseError {
    ParseError::InvalidNumber {
        command: command.to_string(),
        token: token.to_string(),
    }
}

fn missing(command: &str, usage: &'static str) -> ParseError {
    ParseError::MissingArguments {
        command: command.to_string(),
        usage,
    }
}
