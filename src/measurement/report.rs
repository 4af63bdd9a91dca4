//! Console report for an analyzed measurement

use super::{MeasurementFile, Summary};
use colored::Colorize;

/// Report fields as `(label, value)` pairs, in display order
pub fn report_fields(file: &MeasurementFile, summary: &Summary) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("Peak Pressure", file.footer.peak_pressure_or_placeholder().to_string()),
        ("Total Duration", file.footer.total_duration_or_placeholder().to_string()),
        ("Number of samples", summary.count.to_string()),
        ("Average Pressure", summary.mean_display()),
        ("Pressure Range", format!("{} - {}", summary.min, summary.max)),
        (
            "Peak sample",
            format!(
                "{} at {} ms",
                summary.peak_row.pressure_adc, summary.peak_row.time_ms
            ),
        ),
    ];

    if !file.title.is_empty() {
        fields.insert(0, ("Title", file.title.clone()));
    }
    fields
}

/// Print the report for `name`
pub fn print_report(name: &str, file: &MeasurementFile, summary: &Summary) {
    println!("\n{}", "=".repeat(60));
    println!("{}", format!("File: {}", name).cyan().bold());
    println!("{}", "=".repeat(60));

    for (label, value) in report_fields(file, summary) {
        println!("{}: {}", label.white().bold(), value);
    }

    if !file.footer.extra.is_empty() {
        println!("\n{}", "Footer Metadata:".white().bold());
        for (label, value) in &file.footer.extra {
            println!("  {}: {}", label, value);
        }
    }

    println!("{}\n", "=".repeat(60));
}
