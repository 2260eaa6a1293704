//! Serial session errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// The port could not be opened (missing, busy, or no permission)
    #[error("failed to open serial port {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },

    /// A read failed mid-session
    #[error("{0}")]
    Read(#[source] std::io::Error),

    /// The log sink could not be written
    #[error("failed to write log line: {0}")]
    Write(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
