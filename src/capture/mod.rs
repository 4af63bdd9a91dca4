//! SD dump capture pipeline
//!
//! Device session → numeric filter → spreadsheet. The device half needs the
//! `serial` feature; turning already-received lines into a workbook does not.

#[cfg(feature = "serial")]
pub mod device;
pub mod filter;
pub mod workbook;

pub use filter::SampleSequence;

use crate::config::OutputSettings;
use crate::error::ReportError;
use std::path::PathBuf;

/// Result of turning a dump into a report
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// Workbook written
    Written { path: PathBuf, samples: usize },
    /// The dump contained no numeric lines; nothing was written
    NoData { lines: usize },
}

/// Filter `lines` and write the workbook.
///
/// Stops before touching the file system when no line is numeric.
pub fn write_report(lines: &[String], output: &OutputSettings) -> Result<CaptureOutcome, ReportError> {
    let samples = SampleSequence::from_lines(lines);
    if samples.is_empty() {
        log::warn!("No numeric values among {} received line(s)", lines.len());
        return Ok(CaptureOutcome::NoData { lines: lines.len() });
    }

    log::info!(
        "Kept {} of {} line(s) as samples",
        samples.len(),
        lines.len()
    );
    workbook::write_workbook(&samples, &output.workbook, &output.sheet_name)?;

    Ok(CaptureOutcome::Written {
        path: output.workbook.clone(),
        samples: samples.len(),
    })
}
