//! Sweep one channel from end to end and back.
//!
//! Run with:
//!   cargo run --example sweep -- /dev/ttyACM0 2
//!
//! Watch the frames from another terminal with:
//!   cargo run -- monitor /dev/ttyACM0 --format pretty

use std::thread;
use std::time::Duration;

use txctl::control::open;
use txctl::frame::{VALUE_MAX, VALUE_MIN};
use txctl::transport::DEFAULT_BAUD_RATE;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let device = args.next().ok_or("usage: sweep <device> [channel]")?;
    let channel: i64 = args.next().map(|c| c.parse()).transpose()?.unwrap_or(0);

    let mut controller = open(&device, DEFAULT_BAUD_RATE)?;
    eprintln!("Sweeping channel {channel} on {device}");

    let up = (VALUE_MIN..=VALUE_MAX).step_by(32);
    let down = (VALUE_MIN..=VALUE_MAX).rev().step_by(32);
    for value in up.chain(down) {
        controller.set_channel(channel, i64::from(value))?;
        thread::sleep(Duration::from_millis(20));
    }

    controller.set_channel(channel, 0)?;
    eprintln!("Sent {} frames", controller.frames_sent());
    controller.close()?;
    Ok(())
}
