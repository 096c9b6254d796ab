use txctl_frame::{CHANNEL_COUNT, MARKER, MODULUS, OFFSET};
use txctl_transport::DEFAULT_BAUD_RATE;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("txctl {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: txctl");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("TXCTL_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "protocol: marker={MARKER} offset={OFFSET} modulus={MODULUS} channels={CHANNEL_COUNT}"
    );
    println!("default_baud: {DEFAULT_BAUD_RATE}");

    Ok(SUCCESS)
}
