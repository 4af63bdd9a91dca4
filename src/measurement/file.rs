//! Measurement file parser
//!
//! Layout written by the blood pressure monitor:
//!
//! ```text
//! Blood Pressure Measurement          <- title, ignored
//! Time(ms),Pressure(ADC)              <- header
//! 0,100                               <- data rows
//! 10,200
//! Peak Pressure: 200                  <- footer, within the last lines
//! Total Duration: 20 ms
//! ```

use super::footer::Footer;
use crate::error::MeasurementError;
use std::fs;
use std::path::Path;

pub const TIME_COLUMN: &str = "Time(ms)";
pub const PRESSURE_COLUMN: &str = "Pressure(ADC)";

/// One sample of the pressure curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementRow {
    pub time_ms: f64,
    pub pressure_adc: f64,
}

impl MeasurementRow {
    pub fn new(time_ms: f64, pressure_adc: f64) -> Self {
        Self {
            time_ms,
            pressure_adc,
        }
    }

    pub fn time_secs(&self) -> f64 {
        self.time_ms / 1000.0
    }
}

/// Parsed measurement file
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementFile {
    pub title: String,
    pub header: Vec<String>,
    /// Rows in file order
    pub rows: Vec<MeasurementRow>,
    pub footer: Footer,
}

/// Positions of the required columns in the header
#[derive(Debug, Clone, Copy)]
struct Columns {
    count: usize,
    time: usize,
    pressure: usize,
}

impl Columns {
    fn from_header(fields: &[String]) -> Result<Self, MeasurementError> {
        let find = |name: &str| {
            fields.iter().position(|f| f == name).ok_or_else(|| {
                MeasurementError::FileFormat(format!("header is missing column '{}'", name))
            })
        };

        Ok(Self {
            count: fields.len(),
            time: find(TIME_COLUMN)?,
            pressure: find(PRESSURE_COLUMN)?,
        })
    }

    /// Parse a data row, or explain why it is not one
    fn parse_row(&self, line: &str) -> Result<MeasurementRow, String> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != self.count {
            return Err(format!(
                "expected {} fields, found {}",
                self.count,
                fields.len()
            ));
        }

        let number = |idx: usize| {
            fields[idx]
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("'{}' is not a number", fields[idx]))
        };

        Ok(MeasurementRow::new(number(self.time)?, number(self.pressure)?))
    }
}

impl MeasurementFile {
    /// Read and parse a measurement file
    pub fn load(path: &Path, footer_window: usize) -> Result<Self, MeasurementError> {
        let content = fs::read_to_string(path).map_err(|source| MeasurementError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse_content(&content, footer_window)
    }

    /// Parse measurement file content.
    ///
    /// Footer metadata is searched only in the last `footer_window` lines,
    /// not counting trailing blank lines. Scanning backwards inside that
    /// window, every line that is not a data row belongs to the footer; the
    /// first data row ends it. Footers shorter than the window therefore
    /// leave the remaining rows in the table.
    pub fn parse_content(content: &str, footer_window: usize) -> Result<Self, MeasurementError> {
        let mut lines: Vec<(usize, &str)> = content
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .collect();
        while lines.last().is_some_and(|(_, line)| line.trim().is_empty()) {
            lines.pop();
        }

        let mut iter = lines.iter();
        let (_, title) = iter
            .next()
            .ok_or_else(|| MeasurementError::FileFormat("file is empty".to_string()))?;
        let (_, header_line) = iter
            .next()
            .ok_or_else(|| MeasurementError::FileFormat("missing header row".to_string()))?;

        let header: Vec<String> = header_line
            .split(',')
            .map(|f| f.trim().to_string())
            .collect();
        let columns = Columns::from_header(&header)?;

        let body = &lines[2..];
        let window_start = body.len().saturating_sub(footer_window);
        let mut footer_start = body.len();
        for idx in (window_start..body.len()).rev() {
            if columns.parse_row(body[idx].1).is_ok() {
                break;
            }
            footer_start = idx;
        }

        let mut rows = Vec::with_capacity(footer_start);
        for &(line_number, line) in &body[..footer_start] {
            if line.trim().is_empty() {
                continue;
            }
            let row = columns.parse_row(line).map_err(|reason| {
                MeasurementError::FileFormat(format!("line {}: {}", line_number, reason))
            })?;
            rows.push(row);
        }

        let footer = Footer::parse_lines(body[footer_start..].iter().map(|&(_, line)| line));

        Ok(Self {
            title: title.trim().to_string(),
            header,
            rows,
            footer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
Blood Pressure Measurement #12345
Time(ms),Pressure(ADC)
0,100
10,200
20,150
---
Peak Pressure: 200
Total Duration: 20 ms
";

    #[test]
    fn test_parse_sample_file() {
        let file = MeasurementFile::parse_content(SAMPLE, 3).unwrap();

        assert_eq!(file.title, "Blood Pressure Measurement #12345");
        assert_eq!(file.header, vec!["Time(ms)", "Pressure(ADC)"]);
        assert_eq!(
            file.rows,
            vec![
                MeasurementRow::new(0.0, 100.0),
                MeasurementRow::new(10.0, 200.0),
                MeasurementRow::new(20.0, 150.0),
            ]
        );
        assert_eq!(file.footer.peak_pressure.as_deref(), Some("200"));
        assert_eq!(file.footer.total_duration.as_deref(), Some("20 ms"));
    }

    #[test]
    fn test_short_footer_keeps_last_rows() {
        let content = "title\nTime(ms),Pressure(ADC)\n0,1\n5,2\n10,3\nPeak Pressure: 3\n";
        let file = MeasurementFile::parse_content(content, 3).unwrap();

        assert_eq!(file.rows.len(), 3);
        assert_eq!(file.footer.peak_pressure.as_deref(), Some("3"));
        assert_eq!(file.footer.total_duration, None);
    }

    #[test]
    fn test_footer_outside_window_is_an_error() {
        let content = "title\nTime(ms),Pressure(ADC)\n0,1\nDevice: BP-01\nnotes\nPeak Pressure: 1\nTotal Duration: 0 ms\n";
        let err = MeasurementFile::parse_content(content, 3).unwrap_err();

        match err {
            MeasurementError::FileFormat(msg) => assert!(msg.starts_with("line 4:"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wider_window_accepts_longer_footer() {
        let content = "title\nTime(ms),Pressure(ADC)\n0,1\nDevice: BP-01\nnotes\nPeak Pressure: 1\nTotal Duration: 0 ms\n";
        let file = MeasurementFile::parse_content(content, 5).unwrap();

        assert_eq!(file.rows.len(), 1);
        assert_eq!(file.footer.extra, vec![("Device".to_string(), "BP-01".to_string())]);
    }

    #[test]
    fn test_column_order_and_extra_columns() {
        let content = "title\nPressure(ADC), Time(ms), Cuff\n300, 0, 1\n310, 8, 1\n";
        let file = MeasurementFile::parse_content(content, 3).unwrap();

        assert_eq!(
            file.rows,
            vec![MeasurementRow::new(0.0, 300.0), MeasurementRow::new(8.0, 310.0)]
        );
        assert_eq!(file.footer, Footer::default());
    }

    #[test]
    fn test_missing_pressure_column() {
        let content = "title\nTime(ms),Value\n0,1\n";
        let err = MeasurementFile::parse_content(content, 3).unwrap_err();
        assert!(err.to_string().contains("Pressure(ADC)"));
    }

    #[test]
    fn test_header_is_never_data() {
        let content = "title\nTime(ms),Pressure(ADC)\n";
        let file = MeasurementFile::parse_content(content, 3).unwrap();
        assert!(file.rows.is_empty());
    }

    #[test]
    fn test_empty_and_headerless_files() {
        assert!(matches!(
            MeasurementFile::parse_content("", 3),
            Err(MeasurementError::FileFormat(_))
        ));
        assert!(matches!(
            MeasurementFile::parse_content("only a title\n", 3),
            Err(MeasurementError::FileFormat(_))
        ));
    }

    #[test]
    fn test_non_numeric_row_reports_line() {
        let content = "title\nTime(ms),Pressure(ADC)\n0,1\n5,abc\n10,3\n20,4\n30,5\n";
        let err = MeasurementFile::parse_content(content, 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed measurement file: line 4: 'abc' is not a number"
        );
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let content = "title\r\nTime(ms),Pressure(ADC)\r\n0,100\r\n\r\n10,120\r\nPeak Pressure: 120\r\n\r\n";
        let file = MeasurementFile::parse_content(content, 3).unwrap();

        assert_eq!(file.rows.len(), 2);
        assert_eq!(file.footer.peak_pressure.as_deref(), Some("120"));
    }

    #[test]
    fn test_load_from_disk() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "{}", SAMPLE).unwrap();

        let file = MeasurementFile::load(tmp.path(), 3).unwrap();
        assert_eq!(file.rows.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = MeasurementFile::load(Path::new("/nonexistent/bp_1.txt"), 3).unwrap_err();
        assert!(matches!(err, MeasurementError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/bp_1.txt"));
    }
}
