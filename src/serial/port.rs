//! Serial port configuration and connection management
//!
//! Opens the device 8N1 and hands out one byte per read, distinguishing
//! "nothing arrived before the timeout" from a real failure.

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{ErrorKind, Read};
use std::time::Duration;

use super::error::{MonitorError, Result};

/// Baud rate used when none is given
pub const DEFAULT_BAUD: u32 = 115200;

/// How long a single read waits for a byte
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration for serial port connection
#[derive(Debug, Clone)]
pub struct PortConfig {
    /// Serial port path (e.g., /dev/ttyUSB0, /dev/ttyACM0)
    pub port_path: String,
    /// Baud rate (default: 115200)
    pub baud_rate: u32,
    /// Data bits (default: 8)
    pub data_bits: DataBits,
    /// Parity (default: None)
    pub parity: Parity,
    /// Stop bits (default: 1)
    pub stop_bits: StopBits,
    /// Flow control (default: None)
    pub flow_control: FlowControl,
    /// Read timeout
    pub timeout: Duration,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            port_path: String::new(),
            baud_rate: DEFAULT_BAUD,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            timeout: READ_TIMEOUT,
        }
    }
}

impl PortConfig {
    /// Create a new 8N1 configuration for the given device
    pub fn new(port_path: &str) -> Self {
        Self {
            port_path: port_path.to_string(),
            ..Default::default()
        }
    }

    /// Set the baud rate
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }
}

/// Anything the monitor loop can pull bytes from.
///
/// `Ok(None)` means no data arrived in time and the caller may retry;
/// `Err` is fatal to the session.
pub trait ByteSource {
    fn read_byte(&mut self) -> Result<Option<u8>>;
}

/// An open serial port. The port is closed when this is dropped.
pub struct SerialConnection {
    port: Box<dyn SerialPort>,
    config: PortConfig,
}

impl SerialConnection {
    /// Open a serial connection with the given configuration.
    ///
    /// A single attempt is made. On Unix the port is opened exclusively, so a
    /// device already held by another process fails here.
    pub fn open(config: PortConfig) -> Result<Self> {
        let port = serialport::new(&config.port_path, config.baud_rate)
            .data_bits(config.data_bits)
            .parity(config.parity)
            .stop_bits(config.stop_bits)
            .flow_control(config.flow_control)
            .timeout(config.timeout)
            .open()
            .map_err(|source| MonitorError::Open {
                path: config.port_path.clone(),
                source,
            })?;

        log::debug!(
            "opened {} at {} baud, timeout {:?}",
            config.port_path,
            config.baud_rate,
            config.timeout
        );

        Ok(Self { port, config })
    }

    /// Get the port configuration
    pub fn config(&self) -> &PortConfig {
        &self.config
    }
}

impl ByteSource for SerialConnection {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(1) => Ok(Some(byte[0])),
            Ok(_) => Ok(None),
            Err(e) if is_no_data(e.kind()) => Ok(None),
            Err(e) => Err(MonitorError::Read(e)),
        }
    }
}

impl Drop for SerialConnection {
    fn drop(&mut self) {
        log::debug!("closing {}", self.config.port_path);
    }
}

/// Read errors that only mean "nothing yet"
fn is_no_data(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
    )
}
