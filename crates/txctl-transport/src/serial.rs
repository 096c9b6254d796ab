use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::stream::SerialStream;

/// Default link speed of the transmitter's serial input.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default read/write timeout applied to opened ports.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration for opening a serial link.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Line speed in baud. Default: 115200.
    pub baud_rate: u32,
    /// Blocking read/write timeout.
    pub timeout: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LinkConfig {
    /// Default configuration at an explicit baud rate.
    pub fn with_baud(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Self::default()
        }
    }
}

/// Serial port transport.
///
/// Opens devices as 8 data bits, no parity, 1 stop bit, no flow control.
pub struct SerialLink;

impl SerialLink {
    /// Open a serial device at the default baud rate.
    pub fn open(device: &str) -> Result<SerialStream> {
        Self::open_with_config(device, &LinkConfig::default())
    }

    /// Open a serial device with explicit configuration.
    pub fn open_with_config(device: &str, config: &LinkConfig) -> Result<SerialStream> {
        let port = serialport::new(device, config.baud_rate)
            .timeout(config.timeout)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .open()
            .map_err(|source| TransportError::Open {
                device: device.to_string(),
                baud: config.baud_rate,
                source,
            })?;

        info!(device, baud = config.baud_rate, "opened serial link");
        Ok(SerialStream::from_port(port))
    }

    /// Open a plain file (capture, FIFO) for reading.
    pub fn open_file(path: impl AsRef<Path>) -> Result<SerialStream> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| TransportError::OpenFile {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(?path, "opened file link");
        Ok(SerialStream::from_file(file))
    }

    /// Open `path` as a serial device when it is a character device,
    /// otherwise as a plain file.
    pub fn open_any(path: impl AsRef<Path>, config: &LinkConfig) -> Result<SerialStream> {
        let path = path.as_ref();
        if is_char_device(path) {
            let device = path.to_string_lossy();
            Self::open_with_config(&device, config)
        } else {
            Self::open_file(path)
        }
    }
}

#[cfg(unix)]
fn is_char_device(path: &Path) -> bool {
    use std::os::unix::fs::FileTypeExt;

    std::fs::metadata(path)
        .map(|meta| meta.file_type().is_char_device())
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_char_device(path: &Path) -> bool {
    !path.exists()
}

/// A serial port discovered on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSummary {
    /// Device name, e.g. `/dev/ttyACM0` or `COM3`.
    pub name: String,
    /// Port kind: `usb`, `pci`, `bluetooth` or `unknown`.
    pub kind: &'static str,
    /// Product string for USB ports.
    pub product: Option<String>,
}

/// List the serial ports available on this host.
pub fn available_ports() -> Result<Vec<PortSummary>> {
    let ports = serialport::available_ports().map_err(TransportError::Enumerate)?;
    Ok(ports
        .into_iter()
        .map(|info| {
            let (kind, product) = match info.port_type {
                serialport::SerialPortType::UsbPort(usb) => ("usb", usb.product),
                serialport::SerialPortType::PciPort => ("pci", None),
                serialport::SerialPortType::BluetoothPort => ("bluetooth", None),
                serialport::SerialPortType::Unknown => ("unknown", None),
            };
            PortSummary {
                name: info.port_name,
                kind,
                product,
            }
        })
        .collect())
}
