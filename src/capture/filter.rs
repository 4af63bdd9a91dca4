//! Numeric filter for device dump lines

/// Ordered samples in receipt order. Sample `i` (1-based) is `values[i - 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSequence {
    values: Vec<f64>,
}

impl SampleSequence {
    /// Keep every line that parses as a finite number, in order.
    /// Stray log lines from the device are dropped silently.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values = lines
            .into_iter()
            .filter_map(|line| line.as_ref().trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .collect();

        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// `(sample number, value)` pairs, numbered from 1
    pub fn indexed(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values.iter().enumerate().map(|(i, &v)| (i + 1, v))
    }
}

impl From<Vec<f64>> for SampleSequence {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}
