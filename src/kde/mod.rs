//! Kernel density estimation on bounded, reflective, and periodic domains.
//!
//! - [`univariate`] - Unbounded Gaussian KDE, the base kernel
//! - [`bounded`] - Gaussian KDE behind a boundary transform
//! - [`circular`] - Von Mises KDE for angular parameters
//!
//! [`fit_density`] picks the estimator for a [`Domain`] and returns it as a
//! [`FittedDensity`] trait object.

mod bounded;
mod circular;
mod univariate;

pub use bounded::BoundedKde;
pub use circular::{BandwidthRule, CircularConfig, CircularKde};
pub use univariate::{Bandwidth, GaussianKde};

use crate::domain::{BoundaryType, Domain};
use crate::error::Result;

/// A density estimate that can be evaluated at query points.
///
/// Implementations never return negative or non-finite values.
pub trait FittedDensity: Send + Sync {
    /// Evaluates the density at every point.
    fn evaluate(&self, points: &[f64]) -> Vec<f64>;
}

/// Estimator used for `BoundaryType::Periodic` domains.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PeriodicMethod {
    /// Gaussian kernels on samples replicated one period to either side.
    #[default]
    Augmented,
    /// Von Mises kernels.
    VonMises,
}

/// Estimator settings shared by every fit in a comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KdeConfig {
    /// Bandwidth rule for the Gaussian estimators.
    pub bandwidth: Bandwidth,
    /// How periodic domains are handled.
    pub periodic: PeriodicMethod,
    /// Settings for the von Mises estimator.
    pub circular: CircularConfig,
}

/// Fits the estimator matching `domain`.
///
/// # Errors
///
/// Propagates the errors of [`BoundedKde::fit`] and [`CircularKde::fit`].
///
/// # Examples
///
/// ```
/// use posterior_jsd::kde::{fit_density, KdeConfig};
/// use posterior_jsd::{BoundaryType, Domain};
///
/// let domain = Domain::new(Some(0.0), Some(1.0), Some(BoundaryType::Reflective)).unwrap();
/// let density = fit_density(&[0.1, 0.4, 0.5, 0.9], &domain, &KdeConfig::default()).unwrap();
/// assert_eq!(density.evaluate(&[0.0, 0.5, 1.0]).len(), 3);
/// ```
pub fn fit_density(
    samples: &[f64],
    domain: &Domain,
    config: &KdeConfig,
) -> Result<Box<dyn FittedDensity>> {
    if domain.boundary() == BoundaryType::Periodic && config.periodic == PeriodicMethod::VonMises {
        let kde = CircularKde::fit(samples, domain.lower(), domain.upper(), &config.circular)?;
        return Ok(Box::new(kde));
    }
    Ok(Box::new(BoundedKde::fit(samples, domain, config.bandwidth)?))
}
