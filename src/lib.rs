//! Serial console logger library
//!
//! Reusable pieces behind the `serial-log` binary: the serial connection,
//! the line reconstructor and the timestamped log sink.

pub mod serial;
