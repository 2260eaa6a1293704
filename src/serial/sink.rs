//! Timestamped log line output

use chrono::{DateTime, Utc};
use std::io::{self, Write};

use super::reconstruct::Event;

/// Timestamp layout of every log line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render one log line: the timestamp, then `: msg` unless `msg` is empty
pub fn format_line(at: DateTime<Utc>, msg: &str) -> String {
    let mut line = at.format(TIMESTAMP_FORMAT).to_string();
    if !msg.is_empty() {
        line.push_str(": ");
        line.push_str(msg);
    }
    line
}

/// Text logged for a reconstructed message
pub fn describe_message(text: &str) -> String {
    format!("Message from remote: '{}'", text)
}

/// Line-oriented writer that flushes after every entry
pub struct LogSink<W: Write> {
    out: W,
}

impl LogSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> LogSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write a timestamped line for `msg`
    pub fn log(&mut self, msg: &str) -> io::Result<()> {
        self.log_at(Utc::now(), msg)
    }

    pub fn log_at(&mut self, at: DateTime<Utc>, msg: &str) -> io::Result<()> {
        writeln!(self.out, "{}", format_line(at, msg))?;
        self.out.flush()
    }

    /// Write an untimestamped line (banners, notices)
    pub fn plain(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }

    pub fn event(&mut self, event: &Event) -> io::Result<()> {
        match event {
            Event::Heartbeat => self.log(""),
            Event::Message(text) => self.log(&describe_message(text)),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
