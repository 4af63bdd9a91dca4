//! Blood pressure measurement analysis
//!
//! This module provides functionality for:
//! - Parsing measurement files recorded by the monitor
//! - Extracting footer metadata
//! - Computing pressure statistics and the peak sample
//! - Printing a report and plotting the pressure curve

pub mod file;
pub mod footer;
pub mod plot;
pub mod report;
pub mod summary;

pub use file::{MeasurementFile, MeasurementRow};
pub use footer::Footer;
pub use summary::Summary;

use crate::error::MeasurementError;
use std::path::Path;
use walkdir::WalkDir;

/// Parsed file together with its statistics
#[derive(Debug, Clone)]
pub struct Analysis {
    pub file: MeasurementFile,
    pub summary: Summary,
}

/// Parse `path` and summarize its rows
pub fn analyze_file(path: &Path, footer_window: usize) -> Result<Analysis, MeasurementError> {
    let file = MeasurementFile::load(path, footer_window)?;
    let summary = Summary::from_rows(&file.rows)?;
    log::debug!("{}: {} row(s)", path.display(), summary.count);
    Ok(Analysis { file, summary })
}

/// Measurement files below `dir` (`*.txt`), sorted by path
pub fn find_measurement_files(dir: &Path) -> Vec<std::path::PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        })
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_analyze_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bp_1.txt");
        fs::write(
            &path,
            "BP\nTime(ms),Pressure(ADC)\n0,100\n10,200\n20,150\nPeak Pressure: 200\nTotal Duration: 20 ms\n",
        )
        .unwrap();

        let analysis = analyze_file(&path, 3).unwrap();
        assert_eq!(analysis.summary.count, 3);
        assert_eq!(analysis.summary.peak_row, MeasurementRow::new(10.0, 200.0));
    }

    #[test]
    fn test_header_only_file_has_no_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bp_empty.txt");
        fs::write(&path, "BP\nTime(ms),Pressure(ADC)\nPeak Pressure: 0\n").unwrap();

        let err = analyze_file(&path, 3).unwrap_err();
        assert!(matches!(err, MeasurementError::NoValidData));
    }

    #[test]
    fn test_find_measurement_files() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("day2")).unwrap();
        fs::write(dir.path().join("bp_2.txt"), "").unwrap();
        fs::write(dir.path().join("day2").join("bp_3.TXT"), "").unwrap();
        fs::write(dir.path().join("bp_2_plot.svg"), "").unwrap();

        let files = find_measurement_files(dir.path());
        assert_eq!(
            files,
            vec![
                dir.path().join("bp_2.txt"),
                dir.path().join("day2").join("bp_3.TXT"),
            ]
        );
    }
}
