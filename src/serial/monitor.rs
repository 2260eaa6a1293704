//! Serial console logging loop
//!
//! Pulls one byte per iteration from a [`ByteSource`], feeds it to a
//! [`LineReconstructor`] and writes whatever it emits to a [`LogSink`].
//! The loop ends when the stop flag is raised or a read fails; a line still
//! waiting for its line feed at that point is dropped.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::error::{MonitorError, Result};
use super::port::ByteSource;
use super::reconstruct::{Clock, Event, LineReconstructor, HEARTBEAT_INTERVAL};
use super::sink::LogSink;

/// Pause after a read that returned nothing
pub const IDLE_PAUSE: Duration = Duration::from_millis(100);

/// Configuration for the logging loop
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Blank-line interval while nothing valid arrives
    pub heartbeat_interval: Duration,
    /// Sleep between empty reads
    pub idle_pause: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: HEARTBEAT_INTERVAL,
            idle_pause: IDLE_PAUSE,
        }
    }
}

/// Logging session over one byte source
pub struct SerialMonitor<'a, C: Clock, W: Write> {
    config: MonitorConfig,
    reconstructor: LineReconstructor<C>,
    sink: &'a mut LogSink<W>,
    stop: Arc<AtomicBool>,
    line_count: usize,
}

impl<'a, C: Clock, W: Write> SerialMonitor<'a, C, W> {
    pub fn new(
        config: MonitorConfig,
        clock: C,
        sink: &'a mut LogSink<W>,
        stop: Arc<AtomicBool>,
    ) -> Self {
        let reconstructor = LineReconstructor::with_interval(clock, config.heartbeat_interval);
        Self {
            config,
            reconstructor,
            sink,
            stop,
            line_count: 0,
        }
    }

    /// Number of messages logged so far
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Run until the stop flag is raised or the source fails.
    ///
    /// A read failure is logged as `IO error : <detail>` and returned.
    pub fn run<S: ByteSource>(&mut self, source: &mut S) -> Result<()> {
        while !self.stop.load(Ordering::SeqCst) {
            let byte = match source.read_byte() {
                Ok(byte) => byte,
                Err(e) => {
                    self.sink
                        .log(&format!("IO error : {}", e))
                        .map_err(MonitorError::Write)?;
                    return Err(e);
                }
            };

            if let Some(event) = self.reconstructor.feed(byte) {
                if matches!(event, Event::Message(_)) {
                    self.line_count += 1;
                }
                self.sink.event(&event).map_err(MonitorError::Write)?;
            }

            if byte.is_none() && !self.config.idle_pause.is_zero() {
                std::thread::sleep(self.config.idle_pause);
            }
        }

        if !self.reconstructor.pending().is_empty() {
            log::debug!(
                "dropping {} unterminated bytes",
                self.reconstructor.pending().len()
            );
        }
        log::debug!("stopped after {} messages", self.line_count);
        Ok(())
    }
}
