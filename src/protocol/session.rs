//! SD dump session
//!
//! Sends the dump command and collects the lines framed by the start and
//! end markers. Anything the device prints outside the frame is console
//! noise and is dropped.

use super::LineChannel;
use crate::config::SessionSettings;
use crate::error::SessionError;
use chrono::Local;
use std::io::{Read, Write};
use std::time::{Duration, Instant};

/// Pause after an empty poll
const IDLE_PAUSE: Duration = Duration::from_millis(10);

/// Session framing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the start marker
    Idle,
    /// Inside the frame, collecting lines
    Recording,
}

/// Framing parameters for one dump
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub command: String,
    pub start_marker: String,
    pub end_marker: String,
    pub start_timeout: Duration,
    pub transfer_timeout: Duration,
    pub max_lines: usize,
}

impl From<&SessionSettings> for SessionConfig {
    fn from(settings: &SessionSettings) -> Self {
        Self {
            command: settings.command.clone(),
            start_marker: settings.start_marker.clone(),
            end_marker: settings.end_marker.clone(),
            start_timeout: settings.start_timeout(),
            transfer_timeout: settings.transfer_timeout(),
            max_lines: settings.max_lines,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&SessionSettings::default())
    }
}

/// One request/response exchange with the device
pub struct DumpSession {
    config: SessionConfig,
    state: SessionState,
    lines: Vec<String>,
    transcript: Option<Box<dyn Write>>,
}

impl DumpSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::Idle,
            lines: Vec::new(),
            transcript: None,
        }
    }

    /// Copy every received line, timestamped, to `writer`
    pub fn with_transcript(mut self, writer: Box<dyn Write>) -> Self {
        self.transcript = Some(writer);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Lines recorded so far
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Feed one received line through the state machine.
    ///
    /// Returns `Ok(true)` once the end marker closes the frame.
    pub fn accept_line(&mut self, line: String) -> Result<bool, SessionError> {
        self.write_transcript(&line);

        match self.state {
            SessionState::Idle => {
                if line == self.config.start_marker {
                    log::info!("Start marker received, recording");
                    self.state = SessionState::Recording;
                } else {
                    log::debug!("Ignoring console line: {}", line);
                }
                Ok(false)
            }
            SessionState::Recording => {
                if line == self.config.end_marker {
                    log::info!("End marker received after {} line(s)", self.lines.len());
                    return Ok(true);
                }
                if self.lines.len() >= self.config.max_lines {
                    return Err(SessionError::LineLimit {
                        limit: self.config.max_lines,
                    });
                }
                log::debug!("Received: {}", line);
                self.lines.push(line);
                Ok(false)
            }
        }
    }

    /// Send the command and read until the frame closes or a deadline passes
    pub fn run<S: Read + Write>(
        mut self,
        channel: &mut LineChannel<S>,
    ) -> Result<Vec<String>, SessionError> {
        channel.send_line(&self.config.command)?;
        log::info!("Sent {} command", self.config.command);

        let started = Instant::now();
        let mut last_line = started;

        loop {
            match channel.poll_line()? {
                Some(line) => {
                    last_line = Instant::now();
                    if self.accept_line(line)? {
                        return Ok(self.lines);
                    }
                }
                None => std::thread::sleep(IDLE_PAUSE),
            }

            match self.state {
                SessionState::Idle if started.elapsed() >= self.config.start_timeout => {
                    return Err(SessionError::Timeout {
                        waited: self.config.start_timeout,
                    });
                }
                SessionState::Recording if last_line.elapsed() >= self.config.transfer_timeout => {
                    return Err(SessionError::TransferStalled {
                        idle: self.config.transfer_timeout,
                        lines: self.lines.len(),
                    });
                }
                _ => {}
            }
        }
    }

    fn write_transcript(&mut self, line: &str) {
        let Some(writer) = self.transcript.as_mut() else {
            return;
        };

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let result = writeln!(writer, "[{}] {}", timestamp, line).and_then(|_| writer.flush());
        if let Err(e) = result {
            log::warn!("Transcript write failed, disabling transcript: {}", e);
            self.transcript = None;
        }
    }
}
