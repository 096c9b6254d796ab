use txctl_transport::{LinkConfig, SerialLink, SerialStream};

use crate::controller::{ChannelController, ControllerConfig};
use crate::error::Result;

/// Open a serial device at `baud_rate` and wrap it in a controller.
pub fn open(device: &str, baud_rate: u32) -> Result<ChannelController<SerialStream>> {
    open_with_config(
        device,
        &LinkConfig::with_baud(baud_rate),
        ControllerConfig::default(),
    )
}

/// Open with explicit link and controller configuration.
pub fn open_with_config(
    device: &str,
    link_config: &LinkConfig,
    controller_config: ControllerConfig,
) -> Result<ChannelController<SerialStream>> {
    let stream = SerialLink::open_with_config(device, link_config)?;
    Ok(ChannelController::with_config(stream, controller_config))
}
