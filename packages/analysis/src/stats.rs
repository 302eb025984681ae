//! Descriptive statistics for one score field.

use std::collections::BTreeMap;

use serde::Serialize;

/// Summary of the values observed for one field.
///
/// Standard deviation and variance are sample statistics (n - 1 divisor) and
/// are `None` for a single value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: Option<f64>,
    pub variance: Option<f64>,
    pub min: u32,
    pub max: u32,
    pub median: f64,
    /// Value to frequency, ordered by value.
    pub distribution: BTreeMap<u32, usize>,
    /// Raw values in input order.
    pub values: Vec<u32>,
}

impl FieldStats {
    /// Compute statistics for `values`, or `None` if there are none.
    ///
    /// # Examples
    /// ```
    /// use reviewbench_analysis::stats::FieldStats;
    ///
    /// let stats = FieldStats::from_values(&[1, 2, 3, 4]).unwrap();
    /// assert_eq!(stats.mean, 2.5);
    /// assert_eq!(stats.median, 2.5);
    /// assert!(FieldStats::from_values(&[]).is_none());
    /// ```
    pub fn from_values(values: &[u32]) -> Option<Self> {
        let count = values.len();
        if count == 0 {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_unstable();

        let n = count as f64;
        let mean = values.iter().map(|&v| f64::from(v)).sum::<f64>() / n;

        let variance = (count > 1).then(|| {
            values
                .iter()
                .map(|&v| (f64::from(v) - mean).powi(2))
                .sum::<f64>()
                / (n - 1.0)
        });

        let mid = count / 2;
        let median = if count % 2 == 0 {
            (f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0
        } else {
            f64::from(sorted[mid])
        };

        let mut distribution = BTreeMap::new();
        for &v in &sorted {
            *distribution.entry(v).or_insert(0) += 1;
        }

        Some(Self {
            count,
            mean,
            std_dev: variance.map(f64::sqrt),
            variance,
            min: sorted[0],
            max: sorted[count - 1],
            median,
            distribution,
            values: values.to_vec(),
        })
    }

    /// Highest frequency of any single value.
    pub fn max_frequency(&self) -> usize {
        self.distribution.values().copied().max().unwrap_or(0)
    }
}
