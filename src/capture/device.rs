//! Dump request over a real serial port

use crate::config::Settings;
use crate::error::SessionError;
use crate::protocol::{DumpSession, SessionConfig};
use crate::serial::{port, PortConfig};
use std::io::Write;

/// Open `port_path`, request the SD dump and return the framed lines.
///
/// The port is closed before this returns, whatever the outcome.
pub fn fetch_dump(
    port_path: &str,
    settings: &Settings,
    transcript: Option<Box<dyn Write>>,
) -> Result<Vec<String>, SessionError> {
    let port_config = PortConfig::from_settings(port_path, &settings.serial);
    let mut channel = port::open(&port_config)?;

    let mut session = DumpSession::new(SessionConfig::from(&settings.session));
    if let Some(writer) = transcript {
        session = session.with_transcript(writer);
    }

    let result = session.run(&mut channel);
    drop(channel);
    log::debug!("Closed {}", port_path);
    result
}
