use txctl_transport::available_ports;

use crate::cmd::PortsArgs;
use crate::exit::{transport_error, CliResult, SUCCESS};
use crate::output::{print_ports, OutputFormat};

pub fn run(_args: PortsArgs, format: OutputFormat) -> CliResult<i32> {
    let ports = available_ports().map_err(|err| transport_error("port scan failed", err))?;
    print_ports(&ports, format);
    Ok(SUCCESS)
}
