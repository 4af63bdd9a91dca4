//! Serial port configuration, discovery and opening
//!
//! Opens the microcontroller's USB serial port and wraps it in a
//! [`LineChannel`] for the dump session.

use crate::config::SerialSettings;
use crate::error::{PortError, SessionError};
use crate::protocol::LineChannel;
use colored::Colorize;
use serialport::{
    DataBits, FlowControl, Parity, SerialPort, SerialPortInfo, SerialPortType, StopBits,
};
use std::time::Duration;

/// ESP32 hub console baud rate
pub const DEFAULT_BAUD: u32 = 115200;

/// Configuration for serial port connection
#[derive(Debug, Clone)]
pub struct PortConfig {
    /// Serial port path (e.g., /dev/ttyUSB0, COM3)
    pub port_path: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
    /// Per-read timeout; the session polls in steps of this size
    pub timeout: Duration,
    /// Wait after opening before the port is handed out
    pub settle_delay: Duration,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            port_path: String::from("/dev/ttyUSB0"),
            baud_rate: DEFAULT_BAUD,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            timeout: Duration::from_millis(100),
            settle_delay: Duration::from_secs(2),
        }
    }
}

impl PortConfig {
    pub fn new(port_path: &str) -> Self {
        Self {
            port_path: port_path.to_string(),
            ..Default::default()
        }
    }

    /// Build a configuration from tool settings
    pub fn from_settings(port_path: &str, settings: &SerialSettings) -> Self {
        Self::new(port_path)
            .with_baud_rate(settings.baud_rate)
            .with_timeout(settings.poll_timeout())
            .with_settle_delay(settings.settle_delay())
    }

    /// Set the baud rate
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the per-read timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the wait between opening the port and the first command
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }
}

/// Open the port and wait for the device to settle.
///
/// The port closes when the returned channel is dropped.
pub fn open(config: &PortConfig) -> Result<LineChannel<Box<dyn SerialPort>>, SessionError> {
    let port = serialport::new(&config.port_path, config.baud_rate)
        .data_bits(config.data_bits)
        .parity(config.parity)
        .stop_bits(config.stop_bits)
        .flow_control(config.flow_control)
        .timeout(config.timeout)
        .open()
        .map_err(std::io::Error::from)?;

    log::info!(
        "Opened {} at {} baud, settling for {}ms",
        config.port_path,
        config.baud_rate,
        config.settle_delay.as_millis()
    );
    std::thread::sleep(config.settle_delay);

    Ok(LineChannel::new(port))
}

/// A detected serial port
#[derive(Debug, Clone, PartialEq)]
pub struct PortInfo {
    pub path: String,
    /// USB product or manufacturer name, else the bus kind
    pub description: String,
    /// USB vendor and product id
    pub usb_id: Option<(u16, u16)>,
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let (description, usb_id) = match info.port_type {
            SerialPortType::UsbPort(usb) => (
                usb.product
                    .or(usb.manufacturer)
                    .unwrap_or_else(|| "USB Serial".to_string()),
                Some((usb.vid, usb.pid)),
            ),
            SerialPortType::PciPort => ("PCI Serial".to_string(), None),
            SerialPortType::BluetoothPort => ("Bluetooth".to_string(), None),
            SerialPortType::Unknown => ("Unknown".to_string(), None),
        };

        Self {
            path: info.port_name,
            description,
            usb_id,
        }
    }
}

/// List all available serial ports
pub fn list_ports() -> Result<Vec<PortInfo>, PortError> {
    let ports =
        serialport::available_ports().map_err(|e| PortError::Enumerate(e.to_string()))?;
    Ok(ports.into_iter().map(PortInfo::from).collect())
}

/// Print one line per available port, or hints when there are none
pub fn print_ports() -> Result<(), PortError> {
    let ports = list_ports()?;

    if ports.is_empty() {
        println!("{}", "No serial ports found".yellow());
        println!("  Connect the ESP32 hub over USB and check you are in the dialout group");
        return Ok(());
    }

    println!("{}", "Available Serial Ports:".green().bold());
    for port in &ports {
        let usb_id = port
            .usb_id
            .map(|(vid, pid)| format!(" [{:04x}:{:04x}]", vid, pid))
            .unwrap_or_default();
        println!("  {}  {}{}", port.path.white().bold(), port.description, usb_id);
    }
    println!(
        "\n{}",
        "Use: sensor-dump capture -p <PORT> to request a dump".yellow()
    );

    Ok(())
}
