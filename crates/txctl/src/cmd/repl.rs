use std::io;

use tracing::info;
use txctl_control::{open_with_config, CommandLoop, ControllerConfig};
use txctl_transport::LinkConfig;

use crate::cmd::ReplArgs;
use crate::exit::{control_error, CliResult, SUCCESS};

pub fn run(args: ReplArgs) -> CliResult<i32> {
    let controller = open_with_config(
        &args.device,
        &LinkConfig::with_baud(args.baud),
        ControllerConfig { debug: args.debug },
    )
    .map_err(|err| control_error("open failed", err))?;

    let mut repl = CommandLoop::new(controller, io::stdout());
    // On error the loop (and its controller) is dropped, which closes the link.
    repl.run(io::stdin().lock())
        .map_err(|err| control_error("command loop failed", err))?;

    let sent = repl.controller().frames_sent();
    let lines = repl.lines_handled();
    repl.into_controller()
        .close()
        .map_err(|err| control_error("close failed", err))?;

    info!(lines, frames = sent, "command loop finished");
    Ok(SUCCESS)
}
