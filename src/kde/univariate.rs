//! Unbounded Gaussian kernel density estimation.
//!
//! This is the base kernel that the boundary transforms wrap. Samples are
//! kept sorted so that evaluation only visits kernels within a fixed number
//! of bandwidths of the query point.

use crate::error::{Error, Result};
use crate::stats;

/// Kernels further than this many bandwidths away contribute less than
/// `e^{-40}` relative to the peak and are skipped.
const KERNEL_CUTOFF: f64 = 9.0;

/// Bandwidth selection for the Gaussian kernel.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Bandwidth {
    /// Silverman's rule: `h = σ (3n/4)^(-1/5)` with `σ = min(std, IQR / 1.349)`.
    #[default]
    Silverman,
    /// Scott's rule: `h = σ n^(-1/5)`.
    Scott,
    /// A fixed bandwidth in the (transformed) sample space.
    Fixed(f64),
}

impl Bandwidth {
    /// Computes the bandwidth for the given samples.
    ///
    /// Falls back to `1.0` when the samples have no spread.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidBandwidth` for a fixed bandwidth that is not
    /// positive and finite.
    pub fn select(self, samples: &[f64]) -> Result<f64> {
        let h = match self {
            Self::Fixed(h) => {
                if h > 0.0 && h.is_finite() {
                    return Ok(h);
                }
                return Err(Error::InvalidBandwidth(h));
            }
            Self::Silverman => silverman_rule(samples),
            Self::Scott => scotts_rule(samples),
        };
        // All samples identical (or a single sample)
        if h.is_finite() && h > f64::EPSILON {
            Ok(h)
        } else {
            Ok(1.0)
        }
    }
}

/// Silverman's rule of thumb, using the robust spread estimate.
#[allow(clippy::cast_precision_loss)]
fn silverman_rule(samples: &[f64]) -> f64 {
    let n = samples.len() as f64;
    let std_dev = stats::std_dev(samples, 1);
    let sorted = stats::sorted(samples);
    let iqr = (stats::percentile_sorted(&sorted, 75.0) - stats::percentile_sorted(&sorted, 25.0))
        / 1.348_979_500_392_163_4;
    let sigma = if iqr > 0.0 { std_dev.min(iqr) } else { std_dev };
    sigma * (n * 3.0 / 4.0).powf(-0.2)
}

/// Scott's rule: h = n^(-1/5) * sigma.
#[allow(clippy::cast_precision_loss)]
fn scotts_rule(samples: &[f64]) -> f64 {
    let n = samples.len() as f64;
    n.powf(-0.2) * stats::std_dev(samples, 1)
}

/// A Gaussian kernel density estimator for continuous distributions.
///
/// KDE estimates a probability density function from a set of samples by
/// placing Gaussian kernels centered at each sample point.
///
/// # Examples
///
/// ```
/// use posterior_jsd::kde::{Bandwidth, GaussianKde};
///
/// let kde = GaussianKde::new(vec![1.0, 2.0, 3.0, 4.0, 5.0], Bandwidth::Scott).unwrap();
/// assert!(kde.pdf(2.5) > 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct GaussianKde {
    /// The sample points, sorted ascending.
    samples: Vec<f64>,
    /// The bandwidth (standard deviation) of the Gaussian kernels.
    bandwidth: f64,
}

impl GaussianKde {
    /// Creates a new KDE with the given bandwidth rule.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptySamples` if `samples` is empty.
    /// Returns `Error::InvalidBandwidth` if a fixed bandwidth is not positive.
    pub fn new(mut samples: Vec<f64>, bandwidth: Bandwidth) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::EmptySamples);
        }

        let bandwidth = bandwidth.select(&samples)?;
        samples.sort_by(f64::total_cmp);
        Ok(Self { samples, bandwidth })
    }

    /// Returns the probability density at point `x`.
    ///
    /// f(x) = (1/n) * `sum_i` K((x - `x_i`) / h) / h
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn pdf(&self, x: f64) -> f64 {
        let n = self.samples.len() as f64;
        let inv_bandwidth = 1.0 / self.bandwidth;
        let normalization = inv_bandwidth / (2.0 * core::f64::consts::PI).sqrt();

        let reach = KERNEL_CUTOFF * self.bandwidth;
        let start = self.samples.partition_point(|&xi| xi < x - reach);
        let end = self.samples.partition_point(|&xi| xi <= x + reach);

        let density: f64 = self.samples[start..end]
            .iter()
            .map(|&xi| {
                let z = (x - xi) * inv_bandwidth;
                normalization * (-0.5 * z * z).exp()
            })
            .sum();

        density / n
    }

    /// Evaluates the density at every point.
    #[must_use]
    pub fn evaluate(&self, points: &[f64]) -> Vec<f64> {
        points.iter().map(|&x| self.pdf(x)).collect()
    }

    /// Returns the bandwidth of this KDE.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Number of kernels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; a KDE cannot be built from zero samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kde_pdf_basic() {
        let samples = vec![0.0, 1.0, 2.0];
        let kde = GaussianKde::new(samples, Bandwidth::Scott).unwrap();

        // Density should be positive everywhere
        assert!(kde.pdf(0.0) > 0.0);
        assert!(kde.pdf(1.0) > 0.0);
        assert!(kde.pdf(2.0) > 0.0);

        // Density should be higher near sample points
        let mid_density = kde.pdf(1.0);
        let far_density = kde.pdf(10.0);
        assert!(mid_density > far_density);
    }

    #[test]
    fn test_kde_pdf_integrates_to_one() {
        let samples = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let kde = GaussianKde::new(samples, Bandwidth::Silverman).unwrap();

        // Numerical integration over a wide range
        let n_points = 10000;
        let low = -10.0;
        let high = 15.0;
        let dx = (high - low) / f64::from(n_points);

        let integral: f64 = (0..n_points)
            .map(|i| {
                let x = low + (f64::from(i) + 0.5) * dx;
                kde.pdf(x) * dx
            })
            .sum();

        assert!(
            (integral - 1.0).abs() < 0.01,
            "Integral = {integral}, expected ~1.0"
        );
    }

    #[test]
    fn test_kde_with_fixed_bandwidth() {
        let samples = vec![0.0, 1.0, 2.0];
        let kde = GaussianKde::new(samples, Bandwidth::Fixed(0.5)).unwrap();

        assert!((kde.bandwidth() - 0.5).abs() < f64::EPSILON);
        // Single kernel peak plus two tails at one bandwidth-pair away
        let expected = (1.0 + 2.0 * (-2.0f64).exp()) / (3.0 * 0.5 * (2.0 * core::f64::consts::PI).sqrt());
        assert!((kde.pdf(1.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_kde_cutoff_matches_full_sum() {
        let samples: Vec<f64> = (0..200).map(|i| f64::from(i) * 0.1).collect();
        let kde = GaussianKde::new(samples.clone(), Bandwidth::Fixed(0.3)).unwrap();
        for x in [-1.0, 0.0, 5.55, 19.9, 25.0] {
            let full: f64 = samples
                .iter()
                .map(|xi| {
                    let z = (x - xi) / 0.3;
                    (-0.5 * z * z).exp() / (0.3 * (2.0 * core::f64::consts::PI).sqrt())
                })
                .sum::<f64>()
                / 200.0;
            assert!((kde.pdf(x) - full).abs() <= 1e-15 + full * 1e-12);
        }
    }

    #[test]
    fn test_kde_single_sample() {
        let kde = GaussianKde::new(vec![5.0], Bandwidth::Silverman).unwrap();

        // Degenerate spread falls back to a unit bandwidth
        assert!((kde.bandwidth() - 1.0).abs() < f64::EPSILON);
        assert!(kde.pdf(5.0) > 0.0);
        assert!(kde.pdf(4.5) > 0.0);
    }

    #[test]
    fn test_silverman_uses_robust_spread() {
        // One far outlier inflates the std but not the IQR
        let mut samples: Vec<f64> = (0..99).map(|i| f64::from(i) / 98.0).collect();
        samples.push(1000.0);
        let silverman = Bandwidth::Silverman.select(&samples).unwrap();
        let scott = Bandwidth::Scott.select(&samples).unwrap();
        assert!(silverman < 0.2, "Silverman bandwidth {silverman}");
        assert!(scott > 10.0, "Scott bandwidth {scott}");
    }

    #[test]
    fn test_scotts_rule_bandwidth() {
        let samples = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let kde = GaussianKde::new(samples, Bandwidth::Scott).unwrap();

        // n = 10, n^(-1/5) ≈ 0.631, std ≈ 3.03
        let bandwidth = kde.bandwidth();
        assert!(
            bandwidth > 1.0 && bandwidth < 3.0,
            "Bandwidth {bandwidth} outside expected range"
        );
    }

    #[test]
    fn test_kde_empty_samples() {
        let result = GaussianKde::new(vec![], Bandwidth::Silverman);
        assert!(matches!(result, Err(Error::EmptySamples)));
    }

    #[test]
    fn test_kde_non_positive_bandwidth() {
        let result = GaussianKde::new(vec![1.0, 2.0, 3.0], Bandwidth::Fixed(0.0));
        assert!(matches!(result, Err(Error::InvalidBandwidth(_))));
        let result = GaussianKde::new(vec![1.0, 2.0, 3.0], Bandwidth::Fixed(-1.0));
        assert!(matches!(result, Err(Error::InvalidBandwidth(_))));
    }
}
