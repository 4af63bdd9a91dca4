//! Device dump protocol
//!
//! The device answers a single text command with console noise, a start
//! marker line, one value per line and an end marker line. This module
//! handles the line framing independently of the transport so it can run
//! over a serial port or an in-memory stream.

pub mod channel;
pub mod session;

pub use channel::LineChannel;
pub use session::{DumpSession, SessionConfig, SessionState};
