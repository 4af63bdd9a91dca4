//! Footer metadata of a measurement file
//!
//! The monitor appends free-text `label: value` lines after the data
//! table. Labels are matched by substring so decorations such as
//! `# Peak Pressure (ADC): 512` still resolve.

/// Label of the peak pressure footer line
pub const PEAK_PRESSURE: &str = "Peak Pressure";
/// Label of the recording duration footer line
pub const TOTAL_DURATION: &str = "Total Duration";
/// Shown in reports when a footer field is missing
pub const PLACEHOLDER: &str = "N/A";

/// Parsed footer metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Footer {
    pub peak_pressure: Option<String>,
    pub total_duration: Option<String>,
    /// Other `label: value` lines, in file order
    pub extra: Vec<(String, String)>,
}

impl Footer {
    /// Parse footer lines. Lines without a colon carry no metadata and
    /// are skipped. A repeated label keeps its last value.
    pub fn parse_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut footer = Self::default();

        for line in lines {
            let Some((label, value)) = line.split_once(':') else {
                if !line.trim().is_empty() {
                    log::debug!("Skipping unlabeled footer line: {}", line);
                }
                continue;
            };
            let label = label.trim();
            let value = value.trim().to_string();

            if label.contains(PEAK_PRESSURE) {
                footer.peak_pressure = Some(value);
            } else if label.contains(TOTAL_DURATION) {
                footer.total_duration = Some(value);
            } else {
                footer.extra.push((label.to_string(), value));
            }
        }

        footer
    }

    pub fn peak_pressure_or_placeholder(&self) -> &str {
        self.peak_pressure.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn total_duration_or_placeholder(&self) -> &str {
        self.total_duration.as_deref().unwrap_or(PLACEHOLDER)
    }
}
