//! Line reconstruction from a noisy serial byte stream
//!
//! Bytes arrive one at a time (or not at all when the port times out). Valid
//! bytes are accumulated into a pending line that is emitted when a line feed
//! arrives; everything else is dropped. While the line is idle or full of
//! garbage, a heartbeat fires once per interval so the operator can see the
//! tool is still alive.

use std::time::{Duration, Instant};

/// Default interval between idle heartbeats
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

const LF: u8 = 0x0A;
const CR: u8 = 0x0D;

/// Source of monotonic time for the idle timer
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Classification of one read from the port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    /// Nothing was read
    Absent,
    /// Space through tilde
    Printable,
    /// Line feed or carriage return
    Whitespace,
    /// Control characters, DEL and anything outside ASCII
    Invalid,
}

impl ByteClass {
    pub fn of(byte: Option<u8>) -> Self {
        match byte {
            None => ByteClass::Absent,
            Some(LF) | Some(CR) => ByteClass::Whitespace,
            Some(b) if b == 0x20 || (b > 0x20 && b < 0x7F) => ByteClass::Printable,
            Some(_) => ByteClass::Invalid,
        }
    }

    pub fn is_valid(self) -> bool {
        matches!(self, ByteClass::Printable | ByteClass::Whitespace)
    }
}

/// Whether a byte passes the printable-ASCII-plus-CR/LF filter
pub fn is_valid_byte(byte: u8) -> bool {
    ByteClass::of(Some(byte)).is_valid()
}

/// Something the driver should log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Idle interval elapsed; log a blank timestamped line
    Heartbeat,
    /// A complete, non-empty line from the remote
    Message(String),
}

/// Rebuilds newline-terminated messages one byte at a time
#[derive(Debug)]
pub struct LineReconstructor<C: Clock = MonotonicClock> {
    pending: String,
    last_heartbeat: Instant,
    interval: Duration,
    clock: C,
}

impl<C: Clock> LineReconstructor<C> {
    /// Create a reconstructor with a custom clock and heartbeat interval.
    ///
    /// The idle timer starts at construction.
    pub fn with_interval(clock: C, interval: Duration) -> Self {
        Self {
            pending: String::new(),
            last_heartbeat: clock.now(),
            interval,
            clock,
        }
    }

    /// Consume one read result.
    ///
    /// Returns at most one event. Never blocks and accepts every byte value.
    pub fn feed(&mut self, byte: Option<u8>) -> Option<Event> {
        let Some(b) = byte.filter(|&b| is_valid_byte(b)) else {
            return self.tick();
        };

        match b {
            LF => self.complete_line(),
            CR => None,
            _ => {
                self.pending.push(char::from(b));
                None
            }
        }
    }

    /// The partial line accumulated since the last line feed
    pub fn pending(&self) -> &str {
        &self.pending
    }

    fn tick(&mut self) -> Option<Event> {
        let now = self.clock.now();
        if now.saturating_duration_since(self.last_heartbeat) >= self.interval {
            self.last_heartbeat = now;
            Some(Event::Heartbeat)
        } else {
            None
        }
    }

    fn complete_line(&mut self) -> Option<Event> {
        // CR/LF never reach the buffer, so an empty buffer is an empty line
        if self.pending.is_empty() {
            None
        } else {
            Some(Event::Message(std::mem::take(&mut self.pending)))
        }
    }
}
