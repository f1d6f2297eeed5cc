//! Gaussian KDE on a bounded, reflective, or periodic domain.

use super::univariate::{Bandwidth, GaussianKde};
use super::FittedDensity;
use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::transform::BoundaryTransform;

/// A Gaussian KDE fitted in the space of a [`BoundaryTransform`].
///
/// Fitting maps the samples through the transform (or augments them) and
/// fits an unbounded [`GaussianKde`] there. Evaluation maps the query points
/// into that space and corrects the base density back into the original one.
///
/// Non-finite density values are reported as `0.0`.
///
/// # Examples
///
/// ```
/// use posterior_jsd::kde::{Bandwidth, BoundedKde, FittedDensity};
/// use posterior_jsd::{BoundaryType, Domain};
///
/// let domain = Domain::new(Some(0.0), Some(1.0), Some(BoundaryType::Bounded)).unwrap();
/// let samples: Vec<f64> = (1..100).map(|i| f64::from(i) / 100.0).collect();
/// let kde = BoundedKde::fit(&samples, &domain, Bandwidth::Silverman).unwrap();
///
/// let density = kde.evaluate(&[0.25, 0.5, 0.75]);
/// assert!(density.iter().all(|d| *d > 0.0));
/// ```
#[derive(Clone, Debug)]
pub struct BoundedKde {
    transform: BoundaryTransform,
    /// `None` when nothing usable was left to fit; evaluates to zero.
    base: Option<GaussianKde>,
}

impl BoundedKde {
    /// Fits the estimator.
    ///
    /// Transformed samples that are not finite (for example a sample lying
    /// exactly on a probit boundary) are dropped. A degenerate domain or a
    /// sample set with nothing left after dropping yields a density that is
    /// zero everywhere.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptySamples` if `samples` is empty.
    /// Returns `Error::InvalidBandwidth` for an invalid fixed bandwidth.
    pub fn fit(samples: &[f64], domain: &Domain, bandwidth: Bandwidth) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::EmptySamples);
        }

        let transform = BoundaryTransform::from_domain(domain);
        if domain.is_degenerate() {
            trace_debug!(boundary = %domain.boundary(), "degenerate domain, density is zero");
            return Ok(Self {
                transform,
                base: None,
            });
        }

        let finite: Vec<f64> = samples.iter().copied().filter(|x| x.is_finite()).collect();
        let mut transformed = transform.transform(&finite).values;
        let n_before = transformed.len();
        transformed.retain(|v| v.is_finite());
        if transformed.len() < n_before || finite.len() < samples.len() {
            trace_debug!(
                dropped = samples.len() * transform.copies() - transformed.len(),
                "dropped non-finite transformed samples"
            );
        }

        let base = if transformed.is_empty() {
            // Still validate the configuration
            bandwidth.select(&[])?;
            None
        } else {
            // Mirrored copies would inflate the spread, so augmenting
            // transforms pick the bandwidth from the original samples
            let h = if transform.is_augmenting() {
                bandwidth.select(&finite)?
            } else {
                bandwidth.select(&transformed)?
            };
            let kde = GaussianKde::new(transformed, Bandwidth::Fixed(h))?;
            trace_debug!(bandwidth = kde.bandwidth(), kernels = kde.len(), "fitted base KDE");
            Some(kde)
        };

        Ok(Self { transform, base })
    }

    /// Bandwidth of the base kernel, if one was fitted.
    #[must_use]
    pub fn bandwidth(&self) -> Option<f64> {
        self.base.as_ref().map(GaussianKde::bandwidth)
    }

    /// The transform this estimator was fitted with.
    #[must_use]
    pub fn transform(&self) -> &BoundaryTransform {
        &self.transform
    }
}

impl FittedDensity for BoundedKde {
    fn evaluate(&self, points: &[f64]) -> Vec<f64> {
        let Some(base) = &self.base else {
            return vec![0.0; points.len()];
        };

        let mapped = self.transform.map_query(points);
        let base_density = base.evaluate(&mapped.values);
        self.transform
            .correct(&base_density, &mapped.log_abs_det)
            .into_iter()
            .map(|d| if d.is_finite() { d } else { 0.0 })
            .collect()
    }
}
