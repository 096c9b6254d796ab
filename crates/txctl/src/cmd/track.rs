use std::fs::File;
use std::io::{self, BufRead, BufReader};

use tracing::info;
use txctl_control::{HeadTracker, LineOrientationSource, TrackerConfig};

use crate::cmd::{install_ctrlc_handler, parse_duration, TrackArgs};
use crate::exit::{control_error, io_error, CliResult, SUCCESS};

pub fn run(args: TrackArgs) -> CliResult<i32> {
    let config = TrackerConfig {
        x_channel: args.x_channel,
        y_channel: args.y_channel,
        x_component: usize::from(args.x_component),
        y_component: usize::from(args.y_component),
        scale: args.scale,
        interval: parse_duration(&args.interval)?,
    };

    let input: Box<dyn BufRead> = if args.input.as_os_str() == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(&args.input).map_err(|err| {
            io_error(&format!("failed opening {}", args.input.display()), err)
        })?;
        Box::new(BufReader::new(file))
    };

    let running = install_ctrlc_handler()?;
    let mut tracker =
        HeadTracker::with_config(LineOrientationSource::new(input), io::stdout(), config);
    let samples = tracker
        .run(&running, args.count)
        .map_err(|err| control_error("tracking failed", err))?;

    info!(samples, "head tracking stopped");
    Ok(SUCCESS)
}
