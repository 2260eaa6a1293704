//! Serial Log
//!
//! Logs the console of a remote device attached over a serial line. Noise
//! and non-printable bytes are dropped, complete lines are printed with a
//! UTC timestamp, and a blank timestamped line marks every five seconds of
//! silence.
//!
//! # Usage
//!
//! ```bash
//! # Log a device at the default 115200 baud
//! serial-log -d /dev/ttyUSB0
//!
//! # Log at another baud rate
//! serial-log --device /dev/ttyACM0 --bauds 9600
//! ```
//!
//! Exit status: 0 on Ctrl+C or `--help`; 1 when the device is
//! missing, cannot be opened, or fails mid-session; 2 on bad arguments.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use serial_log::serial::port::DEFAULT_BAUD;
use serial_log::serial::{
    LogSink, MonitorConfig, MonitorError, MonotonicClock, PortConfig, SerialConnection,
    SerialMonitor,
};

/// Serial Log
///
/// Timestamped line logger for a remote device's serial console
#[derive(Parser)]
#[command(name = "serial-log")]
#[command(version)]
#[command(about = "Timestamped line logger for a remote device's serial console")]
struct Cli {
    /// Serial port path (e.g., /dev/ttyUSB0)
    #[arg(short, long)]
    device: Option<String>,

    /// Baud rate
    #[arg(short, long, default_value_t = DEFAULT_BAUD)]
    bauds: u32,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut sink = LogSink::stdout();

    let Some(device) = cli.device.filter(|d| !d.is_empty()) else {
        sink.log("Invalid device name!")?;
        return Ok(ExitCode::FAILURE);
    };

    let stop = Arc::new(AtomicBool::new(false));
    register_interrupt(&stop)?;

    sink.plain(&format!("Read port '{}' at {} bauds 8N1", device, cli.bauds))?;

    let config = PortConfig::new(&device).with_baud_rate(cli.bauds);
    let mut conn = match SerialConnection::open(config) {
        Ok(conn) => conn,
        Err(e) => {
            sink.log("Port already open !!!")?;
            log::error!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };
    log::info!(
        "logging {} at {} baud",
        conn.config().port_path,
        conn.config().baud_rate
    );

    let result = SerialMonitor::new(MonitorConfig::default(), MonotonicClock, &mut sink, stop)
        .run(&mut conn);
    drop(conn);

    match result {
        Ok(()) => {
            sink.plain("You pressed Ctrl+C!")?;
            Ok(ExitCode::SUCCESS)
        }
        // Already reported on the log
        Err(MonitorError::Read(_)) => Ok(ExitCode::FAILURE),
        Err(e) => Err(e.into()),
    }
}

/// Raise `stop` on the first Ctrl+C; a second one exits right away
fn register_interrupt(stop: &Arc<AtomicBool>) -> Result<()> {
    use signal_hook::consts::SIGINT;

    // Checked before the flag is set, so only fires once `stop` is already up
    signal_hook::flag::register_conditional_shutdown(SIGINT, 0, Arc::clone(stop))
        .context("Failed to set Ctrl+C handler")?;
    signal_hook::flag::register(SIGINT, Arc::clone(stop))
        .context("Failed to set Ctrl+C handler")?;
    Ok(())
}
