use std::io::ErrorKind;
use std::sync::atomic::Ordering;

use tracing::{info, warn};
use txctl_frame::{FrameError, FrameReader};
use txctl_transport::{LinkConfig, SerialLink};

use crate::cmd::{install_ctrlc_handler, MonitorArgs};
use crate::exit::{frame_error, transport_error, CliResult, SUCCESS};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: MonitorArgs, format: OutputFormat) -> CliResult<i32> {
    let stream = SerialLink::open_any(&args.path, &LinkConfig::with_baud(args.baud))
        .map_err(|err| transport_error("open failed", err))?;

    let running = install_ctrlc_handler()?;
    let mut reader = FrameReader::new(stream);
    let mut printed = 0usize;

    while running.load(Ordering::SeqCst) {
        let frame = match reader.read_frame() {
            Ok(frame) => frame,
            Err(FrameError::ConnectionClosed) => break,
            // Serial reads time out while the line is idle.
            Err(FrameError::Io(err)) if err.kind() == ErrorKind::TimedOut => continue,
            Err(err) => return Err(frame_error("receive failed", err)),
        };

        print_frame(&frame, format);
        printed = printed.saturating_add(1);

        if args.count.is_some_and(|count| printed >= count) {
            break;
        }
    }

    let skipped = reader.skipped_bytes();
    if skipped > 0 {
        warn!(skipped, "discarded bytes while resynchronizing");
    }
    info!(frames = printed, "monitor stopped");
    Ok(SUCCESS)
}
