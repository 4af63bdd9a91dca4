//! Spreadsheet report for captured samples
//!
//! Writes a `Sample`/`Value` table and a line chart over every data row.

use super::SampleSequence;
use crate::error::ReportError;
use rust_xlsxwriter::{Chart, ChartType, Workbook};
use std::fs;
use std::path::Path;

pub const CHART_TITLE: &str = "График полученных данных";
pub const SERIES_NAME: &str = "Received Data";
pub const X_AXIS_NAME: &str = "Номер измерения";
pub const Y_AXIS_NAME: &str = "Значение";

/// Write `samples` to a new workbook at `path`, replacing any existing file.
/// The parent directory is created when missing.
pub fn write_workbook(
    samples: &SampleSequence,
    path: &Path,
    sheet_name: &str,
) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ReportError::OutputDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    worksheet.write_string(0, 0, "Sample")?;
    worksheet.write_string(0, 1, "Value")?;
    for (sample, value) in samples.indexed() {
        let row = sample as u32;
        worksheet.write_number(row, 0, sample as f64)?;
        worksheet.write_number(row, 1, value)?;
    }

    let last_row = samples.len() as u32;
    let mut chart = Chart::new(ChartType::Line);
    chart
        .add_series()
        .set_name(SERIES_NAME)
        .set_categories((sheet_name, 1, 0, last_row, 0))
        .set_values((sheet_name, 1, 1, last_row, 1));
    chart.title().set_name(CHART_TITLE);
    chart.x_axis().set_name(X_AXIS_NAME);
    chart.y_axis().set_name(Y_AXIS_NAME);

    // D2
    worksheet.insert_chart(1, 3, &chart)?;

    workbook.save(path)?;
    log::debug!("Wrote {} sample(s) to {}", samples.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use tempfile::tempdir;

    fn read_back(path: &Path, sheet: &str) -> Vec<(f64, f64)> {
        let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
        let range = workbook.worksheet_range(sheet).unwrap();
        let mut rows = range.rows();

        let header: Vec<String> = rows.next().unwrap().iter().map(|c| c.to_string()).collect();
        assert_eq!(header, vec!["Sample", "Value"]);

        rows.map(|row| match (&row[0], &row[1]) {
            (Data::Float(i), Data::Float(v)) => (*i, *v),
            other => panic!("unexpected cells: {:?}", other),
        })
        .collect()
    }

    #[test]
    fn test_workbook_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("excel").join("data_analysis.xlsx");
        let samples = SampleSequence::from(vec![120.5, 118.0, -3.25, 0.0]);

        write_workbook(&samples, &path, "Data").unwrap();

        let rows = read_back(&path, "Data");
        assert_eq!(
            rows,
            vec![(1.0, 120.5), (2.0, 118.0), (3.0, -3.25), (4.0, 0.0)]
        );
    }

    #[test]
    fn test_workbook_uses_configured_sheet_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dump.xlsx");
        let samples = SampleSequence::from(vec![1.0]);

        write_workbook(&samples, &path, "Dump").unwrap();

        assert_eq!(read_back(&path, "Dump"), vec![(1.0, 1.0)]);
    }
}
