//! Pressure curve plot
//!
//! Renders pressure over time (seconds) with the peak sample marked.

use super::file::MeasurementRow;
use super::summary::Summary;
use crate::error::ReportError;
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Plot file written next to `input`: `bp_12345.txt` → `bp_12345_plot.svg`
pub fn plot_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "measurement".to_string());
    input.with_file_name(format!("{}_plot.svg", stem))
}

/// Legend text for the peak marker
pub fn peak_label(summary: &Summary) -> String {
    format!("Peak: {} ADC", summary.peak_row.pressure_adc)
}

fn plot_err<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Plot(e.to_string())
}

/// Axis ranges covering every row, never empty
fn axis_ranges(rows: &[MeasurementRow], summary: &Summary) -> (Range<f64>, Range<f64>) {
    let (mut x_min, mut x_max) = rows
        .iter()
        .map(MeasurementRow::time_secs)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| (lo.min(x), hi.max(x)));
    if x_min >= x_max {
        x_min -= 0.5;
        x_max += 0.5;
    }

    let pad = ((summary.max - summary.min) * 0.05).max(1.0);
    (x_min..x_max, (summary.min - pad)..(summary.max + pad))
}

/// Render the pressure curve of `rows` to an SVG file at `output`
pub fn render_plot(
    rows: &[MeasurementRow],
    summary: &Summary,
    source_name: &str,
    output: &Path,
    size: (u32, u32),
) -> Result<(), ReportError> {
    let (x_range, y_range) = axis_ranges(rows, summary);
    let title = format!("Blood Pressure Measurement - {}", source_name);

    let root = SVGBackend::new(output, size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Time (seconds)")
        .y_desc("Pressure (ADC Units)")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            rows.iter().map(|r| (r.time_secs(), r.pressure_adc)),
            BLUE.stroke_width(2),
        ))
        .map_err(plot_err)?;

    let peak = (summary.peak_row.time_secs(), summary.peak_row.pressure_adc);
    chart
        .draw_series(std::iter::once(Circle::new(peak, 6, RED.filled())))
        .map_err(plot_err)?
        .label(peak_label(summary))
        .legend(|(x, y)| Circle::new((x, y), 5, RED.filled()));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    log::debug!("Rendered {} point(s) to {}", rows.len(), output.display());
    Ok(())
}
