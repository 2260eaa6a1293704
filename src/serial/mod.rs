//! Serial console logging
//!
//! This module provides functionality for:
//! - Opening a serial device and reading it one byte at a time
//! - Rebuilding text lines from noisy input
//! - Writing timestamped log lines

pub mod error;
pub mod monitor;
pub mod port;
pub mod reconstruct;
pub mod sink;

pub use error::MonitorError;
pub use monitor::{MonitorConfig, SerialMonitor};
pub use port::{PortConfig, SerialConnection};
pub use reconstruct::MonotonicClock;
pub use sink::LogSink;
