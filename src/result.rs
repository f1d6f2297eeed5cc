//! Aggregated divergence results.

use serde::{Deserialize, Serialize};

use crate::stats;

/// Median of a set of replicate values with its 68% spread.
///
/// `plus` is `p84 - median` and `minus` is `median - p16`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MedianError {
    /// The 50th percentile.
    pub median: f64,
    /// Distance from the median up to the 84th percentile.
    pub plus: f64,
    /// Distance from the median down to the 16th percentile.
    pub minus: f64,
}

impl MedianError {
    /// Summarizes `values` by their 16th, 50th and 84th percentiles.
    ///
    /// Returns `None` for an empty slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use posterior_jsd::MedianError;
    ///
    /// let summary = MedianError::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    /// assert_eq!(summary.median, 3.0);
    /// assert!((summary.plus - 1.36).abs() < 1e-12);
    /// assert!((summary.minus - 1.36).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sorted = stats::sorted(values);
        let p16 = stats::percentile_sorted(&sorted, 16.0);
        let p50 = stats::percentile_sorted(&sorted, 50.0);
        let p84 = stats::percentile_sorted(&sorted, 84.0);
        Some(Self {
            median: p50,
            plus: p84 - p50,
            minus: p50 - p16,
        })
    }
}

/// The divergence reported for one parameter.
///
/// Serialized untagged: a number, a `{median, plus, minus}` object, or an
/// array of replicate values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DivergenceResult {
    /// A single replicate.
    Scalar(f64),
    /// Percentile summary over all replicates.
    Summary(MedianError),
    /// Every replicate value, in replicate order.
    Raw(Vec<f64>),
}

impl DivergenceResult {
    /// The central value: the scalar, the median, or the median of the raw
    /// values.
    #[must_use]
    pub fn central(&self) -> f64 {
        match self {
            Self::Scalar(v) => *v,
            Self::Summary(summary) => summary.median,
            Self::Raw(values) => MedianError::from_values(values).map_or(0.0, |s| s.median),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_single_value_has_no_spread() {
        let s = MedianError::from_values(&[0.25]).unwrap();
        assert_eq!(s, MedianError { median: 0.25, plus: 0.0, minus: 0.0 });
        assert!(MedianError::from_values(&[]).is_none());
    }

    #[test]
    fn summary_ignores_input_order() {
        let a = MedianError::from_values(&[5.0, 1.0, 4.0, 2.0, 3.0]).unwrap();
        let b = MedianError::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn untagged_serialization() {
        let scalar = serde_json::to_string(&DivergenceResult::Scalar(0.5)).unwrap();
        assert_eq!(scalar, "0.5");
        let raw = serde_json::to_string(&DivergenceResult::Raw(vec![0.1, 0.2])).unwrap();
        assert_eq!(raw, "[0.1,0.2]");
        let summary: DivergenceResult =
            serde_json::from_str(r#"{"median":0.1,"plus":0.02,"minus":0.01}"#).unwrap();
        assert!((summary.central() - 0.1).abs() < 1e-12);
        assert!(matches!(summary, DivergenceResult::Summary(_)));
    }
}
