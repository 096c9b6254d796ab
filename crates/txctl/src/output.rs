use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use txctl_frame::Frame;
use txctl_transport::PortSummary;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    event: &'a str,
    channel: u8,
    value: i32,
    wire: u16,
    bytes: String,
    timestamp: String,
}

impl<'a> FrameOutput<'a> {
    fn new(event: &'a str, frame: &Frame) -> Self {
        Self {
            event,
            channel: frame.channel,
            value: frame.value(),
            wire: frame.wire,
            bytes: hex_bytes(&frame.to_bytes()),
            timestamp: now_unix_seconds(),
        }
    }
}

#[derive(Serialize)]
struct PortOutput<'a> {
    name: &'a str,
    kind: &'a str,
    product: Option<&'a str>,
}

/// Print a frame that was transmitted.
pub fn print_sent(frame: &Frame, format: OutputFormat) {
    print_frame_event("sent", frame, format);
}

/// Print a frame that was read from a link.
pub fn print_frame(frame: &Frame, format: OutputFormat) {
    print_frame_event("received", frame, format);
}

fn print_frame_event(event: &str, frame: &Frame, format: OutputFormat) {
    let out = FrameOutput::new(event, frame);
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["EVENT", "CHANNEL", "VALUE", "WIRE", "BYTES"])
                .add_row(vec![
                    out.event.to_string(),
                    out.channel.to_string(),
                    out.value.to_string(),
                    out.wire.to_string(),
                    out.bytes.clone(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{} channel={} value={} wire={} bytes=[{}]",
                out.event, out.channel, out.value, out.wire, out.bytes
            );
        }
    }
}

pub fn print_ports(ports: &[PortSummary], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let rows: Vec<PortOutput<'_>> = ports
                .iter()
                .map(|port| PortOutput {
                    name: &port.name,
                    kind: port.kind,
                    product: port.product.as_deref(),
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "TYPE", "PRODUCT"]);
            for port in ports {
                table.add_row(vec![
                    port.name.clone(),
                    port.kind.to_string(),
                    port.product.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            if ports.is_empty() {
                println!("no serial ports found");
            }
            for port in ports {
                match &port.product {
                    Some(product) => println!("{} ({}, {product})", port.name, port.kind),
                    None => println!("{} ({})", port.name, port.kind),
                }
            }
        }
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
