//! End-to-end logging sessions over a scripted byte source and a manual clock.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serial_log::serial::error::Result;
use serial_log::serial::port::ByteSource;
use serial_log::serial::reconstruct::Clock;
use serial_log::serial::{LogSink, MonitorConfig, SerialMonitor};

#[derive(Clone)]
struct ManualClock(Rc<Cell<Instant>>);

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.0.get()
    }
}

/// Feeds bytes, then reports "no data" while moving the clock forward one
/// poll period per read, until `idle_reads` run out.
struct IdleLine {
    bytes: VecDeque<u8>,
    idle_reads: usize,
    clock: ManualClock,
    stop: Arc<AtomicBool>,
}

impl ByteSource for IdleLine {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        if let Some(b) = self.bytes.pop_front() {
            return Ok(Some(b));
        }
        if self.idle_reads == 0 {
            self.stop.store(true, Ordering::SeqCst);
            return Ok(None);
        }
        self.idle_reads -= 1;
        self.clock.0.set(self.clock.0.get() + Duration::from_millis(100));
        Ok(None)
    }
}

fn run_session(bytes: &[u8], idle_reads: usize) -> Vec<String> {
    let clock = ManualClock(Rc::new(Cell::new(Instant::now())));
    let stop = Arc::new(AtomicBool::new(false));
    let mut source = IdleLine {
        bytes: bytes.iter().copied().collect(),
        idle_reads,
        clock: clock.clone(),
        stop: stop.clone(),
    };
    let mut sink = LogSink::new(Vec::new());
    let config = MonitorConfig {
        idle_pause: Duration::ZERO,
        ..Default::default()
    };

    SerialMonitor::new(config, clock, &mut sink, stop)
        .run(&mut source)
        .unwrap();

    String::from_utf8(sink.into_inner())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn is_heartbeat(line: &str) -> bool {
    line.len() == "YYYY-MM-DD HH:MM:SS".len() && !line.contains(": ")
}

#[test]
fn test_lines_then_silence() {
    // 10.2 s of idle polling: heartbeats at 5 s and 10 s
    let lines = run_session(b"U-Boot 2024.01\r\n\x1b[0mready\r\n", 102);
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with(": Message from remote: 'U-Boot 2024.01'"));
    assert!(lines[1].ends_with(": Message from remote: '[0mready'"));
    assert!(is_heartbeat(&lines[2]));
    assert!(is_heartbeat(&lines[3]));
}

#[test]
fn test_short_silence_has_no_heartbeat() {
    let lines = run_session(b"hello\n", 49);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with(": Message from remote: 'hello'"));
}

#[test]
fn test_garbage_only_produces_heartbeats() {
    let lines = run_session(&[0x00, 0xFF, 0x7F, 0x1B, 0x80], 50);
    assert_eq!(lines.len(), 1);
    assert!(is_heartbeat(&lines[0]));
}
