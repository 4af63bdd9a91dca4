//! Tool settings
//!
//! Every value the pipelines need lives here, with defaults matching the
//! ESP32 hub firmware and the blood pressure monitor's SD file layout.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Serial port settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    /// Baud rate
    pub baud_rate: u32,
    /// Delay after opening the port before the command is sent.
    /// The ESP32 resets when DTR toggles on open.
    pub settle_delay_ms: u64,
    /// Per-read poll timeout
    pub poll_timeout_ms: u64,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
            settle_delay_ms: 2000,
            poll_timeout_ms: 100,
        }
    }
}

impl SerialSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}

/// Dump request and framing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Command token sent to the device (a newline is appended)
    pub command: String,
    /// Line that opens the data frame
    pub start_marker: String,
    /// Line that closes the data frame
    pub end_marker: String,
    /// How long to wait for the start marker
    pub start_timeout_secs: u64,
    /// Longest silence tolerated once recording has started
    pub transfer_timeout_secs: u64,
    /// Upper bound on recorded lines
    pub max_lines: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            command: "READ_SD".to_string(),
            start_marker: "---START_FILE---".to_string(),
            end_marker: "---END_FILE---".to_string(),
            start_timeout_secs: 10,
            transfer_timeout_secs: 30,
            max_lines: 1_000_000,
        }
    }
}

impl SessionSettings {
    pub fn start_timeout(&self) -> Duration {
        Duration::from_secs(self.start_timeout_secs)
    }

    pub fn transfer_timeout(&self) -> Duration {
        Duration::from_secs(self.transfer_timeout_secs)
    }
}

/// Output locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Spreadsheet written by `capture`
    pub workbook: PathBuf,
    /// Worksheet name
    pub sheet_name: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from("excel").join("data_analysis.xlsx"),
            sheet_name: "Data".to_string(),
        }
    }
}

/// Measurement file analysis settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Number of trailing lines searched for footer metadata
    pub footer_window: usize,
    /// Plot size in pixels
    pub plot_width: u32,
    pub plot_height: u32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            footer_window: 3,
            plot_width: 1200,
            plot_height: 600,
        }
    }
}

/// Complete tool settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub serial: SerialSettings,
    pub session: SessionSettings,
    pub output: OutputSettings,
    pub analysis: AnalysisSettings,
}
