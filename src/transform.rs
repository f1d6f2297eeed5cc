//! Boundary transforms that let an unbounded kernel estimate a density on a
//! bounded or periodic domain.
//!
//! There are two families:
//!
//! - **Change of variables** (`Identity`, `UnitInterval`, `Probit`): samples
//!   and query points are mapped through the same bijection and the density
//!   is corrected with the log-absolute Jacobian of the forward map.
//! - **Augmentation** (`Reflective`, `Periodic`): samples are replicated
//!   (mirrored across the bounds, or shifted by one period) before fitting.
//!   Query points stay where they are and the density contributions of all
//!   copies are summed at each point.

use crate::domain::{BoundaryType, Domain};
use crate::special;

/// Output of a transform: mapped values and the elementwise `ln |det J|`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transformed {
    /// The transformed values.
    pub values: Vec<f64>,
    /// Log-absolute Jacobian determinant of the map at every value.
    pub log_abs_det: Vec<f64>,
}

impl Transformed {
    fn identity(values: Vec<f64>) -> Self {
        let log_abs_det = vec![0.0; values.len()];
        Self {
            values,
            log_abs_det,
        }
    }
}

/// A boundary-handling strategy built from a [`Domain`].
///
/// # Examples
///
/// ```
/// use posterior_jsd::transform::BoundaryTransform;
/// use posterior_jsd::{BoundaryType, Domain};
///
/// let domain = Domain::new(Some(2.0), Some(4.0), Some(BoundaryType::UnitInterval)).unwrap();
/// let transform = BoundaryTransform::from_domain(&domain);
///
/// let out = transform.transform(&[2.0, 3.0, 4.0]);
/// assert_eq!(out.values, vec![0.0, 0.5, 1.0]);
/// assert!((out.log_abs_det[0] + 2.0f64.ln()).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundaryTransform {
    /// No transform.
    Identity,
    /// `(x - lower) / width`.
    UnitInterval {
        /// Lower bound of the domain.
        lower: f64,
        /// `upper - lower`.
        width: f64,
    },
    /// Unit-interval rescale followed by the inverse Gaussian CDF.
    Probit {
        /// Lower bound of the domain.
        lower: f64,
        /// `upper - lower`.
        width: f64,
    },
    /// Mirror copies across each present bound.
    Reflective {
        /// Lower bound, if any.
        lower: Option<f64>,
        /// Upper bound, if any.
        upper: Option<f64>,
    },
    /// Copies shifted by one period to either side.
    Periodic {
        /// Lower bound of the period.
        lower: f64,
        /// Length of the period.
        period: f64,
    },
}

impl BoundaryTransform {
    /// Selects the transform matching the domain's boundary type.
    ///
    /// [`Domain`] guarantees the bounds each type needs, so this cannot fail.
    #[must_use]
    pub fn from_domain(domain: &Domain) -> Self {
        let lower = domain.lower().unwrap_or(0.0);
        let width = domain.width().unwrap_or(0.0);
        match domain.boundary() {
            BoundaryType::None => Self::Identity,
            BoundaryType::UnitInterval => Self::UnitInterval { lower, width },
            BoundaryType::Bounded => Self::Probit { lower, width },
            BoundaryType::Reflective => Self::Reflective {
                lower: domain.lower(),
                upper: domain.upper(),
            },
            BoundaryType::Periodic => Self::Periodic {
                lower,
                period: width,
            },
        }
    }

    /// Number of copies an augmenting transform produces; 1 otherwise.
    #[must_use]
    pub fn copies(&self) -> usize {
        match *self {
            Self::Reflective { lower, upper } => {
                1 + usize::from(lower.is_some()) + usize::from(upper.is_some())
            }
            Self::Periodic { .. } => 3,
            _ => 1,
        }
    }

    /// True for the sample-augmenting strategies.
    #[must_use]
    pub fn is_augmenting(&self) -> bool {
        matches!(self, Self::Reflective { .. } | Self::Periodic { .. })
    }

    /// Forward map.
    ///
    /// Augmenting transforms return `copies() * values.len()` values laid
    /// out copy-major, with a zero Jacobian term.
    #[must_use]
    pub fn transform(&self, values: &[f64]) -> Transformed {
        match *self {
            Self::Identity => Transformed::identity(values.to_vec()),
            Self::UnitInterval { lower, width } => {
                let log_abs_det = vec![-width.ln(); values.len()];
                Transformed {
                    values: values.iter().map(|&x| (x - lower) / width).collect(),
                    log_abs_det,
                }
            }
            Self::Probit { lower, width } => {
                let unit = Self::UnitInterval { lower, width }.transform(values);
                let (values, log_gauss) = special::inverse_gaussian_cdf(&unit.values);
                Transformed {
                    values,
                    log_abs_det: sum_terms(&unit.log_abs_det, &log_gauss),
                }
            }
            Self::Reflective { lower, upper } => {
                let mut out = Vec::with_capacity(self.copies() * values.len());
                if let Some(lower) = lower {
                    out.extend(values.iter().map(|&x| 2.0 * lower - x));
                }
                out.extend_from_slice(values);
                if let Some(upper) = upper {
                    out.extend(values.iter().map(|&x| 2.0 * upper - x));
                }
                Transformed::identity(out)
            }
            Self::Periodic { period, .. } => {
                let mut out = Vec::with_capacity(3 * values.len());
                out.extend(values.iter().map(|&x| x - period));
                out.extend_from_slice(values);
                out.extend(values.iter().map(|&x| x + period));
                Transformed::identity(out)
            }
        }
    }

    /// Inverse map.
    ///
    /// For augmenting transforms this folds points back into the domain
    /// (mirroring, or wrapping modulo the period) rather than removing copies.
    #[must_use]
    pub fn inverse_transform(&self, values: &[f64]) -> Transformed {
        match *self {
            Self::Identity => Transformed::identity(values.to_vec()),
            Self::UnitInterval { lower, width } => Transformed {
                values: values.iter().map(|&u| u * width + lower).collect(),
                log_abs_det: vec![width.ln(); values.len()],
            },
            Self::Probit { lower, width } => {
                let (unit, log_gauss) = special::gaussian_cdf(values);
                let out = Self::UnitInterval { lower, width }.inverse_transform(&unit);
                Transformed {
                    values: out.values,
                    log_abs_det: sum_terms(&out.log_abs_det, &log_gauss),
                }
            }
            Self::Reflective { lower, upper } => Transformed::identity(
                values
                    .iter()
                    .map(|&x| match (lower, upper) {
                        (Some(l), _) if x < l => 2.0 * l - x,
                        (_, Some(u)) if x > u => 2.0 * u - x,
                        _ => x,
                    })
                    .collect(),
            ),
            Self::Periodic { lower, period } => Transformed::identity(
                values
                    .iter()
                    .map(|&x| (x - lower).rem_euclid(period) + lower)
                    .collect(),
            ),
        }
    }

    /// Maps query points into the space the base kernel was fitted in.
    ///
    /// Augmenting transforms leave query points unchanged.
    #[must_use]
    pub fn map_query(&self, points: &[f64]) -> Transformed {
        if self.is_augmenting() {
            Transformed::identity(points.to_vec())
        } else {
            self.transform(points)
        }
    }

    /// Turns base-kernel densities at mapped query points back into densities
    /// in the original space.
    ///
    /// Change-of-variables transforms apply `exp(ln p + ln |det J|)`.
    /// For augmenting transforms the base kernel averages over
    /// `copies() * n` kernels; summing the contribution of every copy (each
    /// normalized by `n`) multiplies that average by `copies()`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn correct(&self, base_density: &[f64], log_abs_det: &[f64]) -> Vec<f64> {
        if self.is_augmenting() {
            let copies = self.copies() as f64;
            base_density.iter().map(|&d| d * copies).collect()
        } else {
            base_density
                .iter()
                .zip(log_abs_det)
                .map(|(&d, &j)| (d.ln() + j).exp())
                .collect()
        }
    }
}

fn sum_terms(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}
