//! Error types for the capture and analysis pipelines
//!
//! Each pipeline stage has its own error enum. The command handlers in
//! `main.rs` catch these, print them for the operator and return cleanly.

use std::path::PathBuf;
use std::time::Duration;

/// Errors raised while talking to the device
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Read, write or open failure on the channel
    #[error("Serial channel error: {0}")]
    Channel(#[from] std::io::Error),

    /// The start marker never arrived
    #[error("No response from device: start marker not received within {}s", .waited.as_secs())]
    Timeout { waited: Duration },

    /// Recording started but the device went quiet
    #[error("Transfer stalled: no data for {}s after {lines} line(s)", .idle.as_secs())]
    TransferStalled { idle: Duration, lines: usize },

    /// Recording exceeded the configured line limit without an end marker
    #[error("Transfer exceeded {limit} lines without an end marker")]
    LineLimit { limit: usize },
}

/// Errors raised while choosing a serial port
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("No serial ports available")]
    PortUnavailable,

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Port selection aborted")]
    SelectionAborted,

    #[error("Failed to enumerate serial ports: {0}")]
    Enumerate(String),

    #[error("Prompt I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading a measurement file
#[derive(Debug, thiserror::Error)]
pub enum MeasurementError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed measurement file: {0}")]
    FileFormat(String),

    #[error("No measurement rows found")]
    NoValidData,
}

/// Errors raised by the report sinks
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to write spreadsheet: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to render plot: {0}")]
    Plot(String),

    #[error("Failed to prepare output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while loading settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
