use tracing::debug;
use txctl_control::{open_with_config, ControllerConfig};
use txctl_frame::{Frame, CHANNEL_COUNT};
use txctl_transport::{LinkConfig, DEFAULT_BAUD_RATE};

use crate::cmd::SendArgs;
use crate::exit::{control_error, CliError, CliResult, SUCCESS};
use crate::output::{print_sent, OutputFormat};

/// A resolved one-shot request.
#[derive(Debug, Clone, PartialEq)]
struct SendPlan {
    baud: u32,
    channel: usize,
    value: f64,
}

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let plan = resolve_plan(&args.values, args.baud)?;
    debug!(?plan, device = %args.device, "one-shot send");

    let mut controller = open_with_config(
        &args.device,
        &LinkConfig::with_baud(plan.baud),
        ControllerConfig { debug: args.debug },
    )
    .map_err(|err| control_error("open failed", err))?;

    controller
        .send_channel_f64(plan.channel, plan.value)
        .map_err(|err| control_error("send failed", err))?;
    controller
        .close()
        .map_err(|err| control_error("close failed", err))?;

    print_sent(&Frame::from_f64(plan.channel, plan.value), format);
    Ok(SUCCESS)
}

fn resolve_plan(values: &[String], baud: Option<u32>) -> CliResult<SendPlan> {
    let (baud, channel, value) = match values {
        [value] => (baud, None, value),
        [channel, value] => (baud, Some(channel), value),
        [rate, channel, value] => {
            if baud.is_some() {
                return Err(CliError::usage(
                    "--baud cannot be combined with BAUD CHANNEL VALUE",
                ));
            }
            let rate: u32 = rate
                .parse()
                .map_err(|_| CliError::usage(format!("invalid baud rate: {rate}")))?;
            (Some(rate), Some(channel), value)
        }
        _ => {
            return Err(CliError::usage(
                "expected VALUE, CHANNEL VALUE, or BAUD CHANNEL VALUE",
            ))
        }
    };

    let channel = match channel {
        Some(text) => parse_channel(text)?,
        None => 0,
    };
    let value: f64 = match value.parse() {
        Ok(parsed) if f64::is_finite(parsed) => parsed,
        _ => return Err(CliError::usage(format!("invalid value: {value}"))),
    };

    Ok(SendPlan {
        baud: baud.unwrap_or(DEFAULT_BAUD_RATE),
        channel,
        value,
    })
}

fn parse_channel(text: &str) -> CliResult<usize> {
    match text.parse::<usize>() {
        Ok(channel) if channel < CHANNEL_COUNT => Ok(channel),
        _ => Err(CliError::usage(format!(
            "invalid channel {text} (expected 0-{})",
            CHANNEL_COUNT - 1
        ))),
    }
}
