//! Summary statistics over the pressure column

use super::file::MeasurementRow;
use crate::error::MeasurementError;

/// Aggregate view of one measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// First row holding the maximum pressure
    pub peak_row: MeasurementRow,
}

impl Summary {
    pub fn from_rows(rows: &[MeasurementRow]) -> Result<Self, MeasurementError> {
        let (first, rest) = rows.split_first().ok_or(MeasurementError::NoValidData)?;

        let mut sum = first.pressure_adc;
        let mut min = first.pressure_adc;
        let mut peak_row = *first;
        for row in rest {
            sum += row.pressure_adc;
            min = min.min(row.pressure_adc);
            // Strict comparison keeps the earliest row on ties
            if row.pressure_adc > peak_row.pressure_adc {
                peak_row = *row;
            }
        }

        Ok(Self {
            count: rows.len(),
            mean: sum / rows.len() as f64,
            min,
            max: peak_row.pressure_adc,
            peak_row,
        })
    }

    /// Mean rounded to two decimals
    pub fn mean_display(&self) -> String {
        format!("{:.2}", self.mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(pairs: &[(f64, f64)]) -> Vec<MeasurementRow> {
        pairs
            .iter()
            .map(|&(t, p)| MeasurementRow::new(t, p))
            .collect()
    }

    #[test]
    fn test_basic_summary() {
        let summary = Summary::from_rows(&rows(&[(0.0, 100.0), (10.0, 200.0), (20.0, 150.0)])).unwrap();

        assert_eq!(summary.count, 3);
        assert_eq!(summary.mean_display(), "150.00");
        assert_eq!(summary.min, 100.0);
        assert_eq!(summary.max, 200.0);
        assert_eq!(summary.peak_row, MeasurementRow::new(10.0, 200.0));
    }

    #[test]
    fn test_peak_tie_keeps_first_row() {
        let summary = Summary::from_rows(&rows(&[(0.0, 5.0), (1.0, 9.0), (2.0, 9.0)])).unwrap();
        assert_eq!(summary.peak_row.time_ms, 1.0);
    }

    #[test]
    fn test_mean_rounding() {
        let summary = Summary::from_rows(&rows(&[(0.0, 1.0), (1.0, 2.0), (2.0, 2.0)])).unwrap();
        assert_eq!(summary.mean_display(), "1.67");
    }

    #[test]
    fn test_single_row() {
        let summary = Summary::from_rows(&rows(&[(40.0, -3.5)])).unwrap();
        assert_eq!(summary.min, -3.5);
        assert_eq!(summary.max, -3.5);
        assert_eq!(summary.peak_row.time_secs(), 0.04);
    }

    #[test]
    fn test_empty_rows_are_an_error() {
        let err = Summary::from_rows(&[]).unwrap_err();
        assert!(matches!(err, MeasurementError::NoValidData));
    }
}
