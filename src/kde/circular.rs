//! Von Mises kernel density estimation for angular parameters.
//!
//! Samples on `[lower, upper)` are rescaled to angles on `[-π, π)` and every
//! angle carries a von Mises kernel. The kernel concentration `ν` comes from
//! a von Mises concentration `κ` (supplied, or fitted to the samples' mean
//! resultant length) through one of two plug-in bandwidth rules.

use core::f64::consts::PI;

use super::FittedDensity;
use crate::error::{Error, Result};
use crate::special::{bessel_i_scaled, von_mises_resultant_length};
use crate::stats;

/// `0.5 * ln(π)`.
const HALF_LN_PI: f64 = 0.572_364_942_924_700_1;

/// Plug-in rule turning a von Mises concentration into a kernel concentration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BandwidthRule {
    /// `h = [4√π I₀(κ)² / (κ n (2 I₁(2κ) + 3κ I₂(2κ)))]^(1/5)`, `ν = 1/h²`.
    #[default]
    RuleOfThumb,
    /// `ν = [3 n κ² I₂(2κ) / (4√π I₀(κ)²)]^(2/5)`.
    Taylor,
}

/// Concentration settings for [`CircularKde::fit`].
///
/// # Examples
///
/// ```
/// use posterior_jsd::kde::{BandwidthRule, CircularConfig};
///
/// let config = CircularConfig::default()
///     .with_kappa_range(0.1, 50.0)
///     .with_rule(BandwidthRule::Taylor);
/// assert!(config.estimate);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircularConfig {
    /// A fixed von Mises concentration; takes precedence over estimation.
    pub kappa: Option<f64>,
    /// Estimate `κ` from the samples when no fixed value is given.
    pub estimate: bool,
    /// Search interval for the estimated `κ`.
    pub kappa_range: (f64, f64),
    /// Number of evenly spaced candidates in `kappa_range`.
    pub kappa_steps: usize,
    /// Rule deriving the kernel concentration from `κ`.
    pub rule: BandwidthRule,
}

impl Default for CircularConfig {
    fn default() -> Self {
        Self {
            kappa: None,
            estimate: true,
            kappa_range: (0.01, 100.0),
            kappa_steps: 1000,
            rule: BandwidthRule::RuleOfThumb,
        }
    }
}

impl CircularConfig {
    /// Uses a fixed `κ`.
    #[must_use]
    pub fn with_kappa(mut self, kappa: f64) -> Self {
        self.kappa = Some(kappa);
        self
    }

    /// Enables or disables estimating `κ`.
    #[must_use]
    pub fn with_estimate(mut self, estimate: bool) -> Self {
        self.estimate = estimate;
        self
    }

    /// Sets the search interval for `κ`.
    #[must_use]
    pub fn with_kappa_range(mut self, min: f64, max: f64) -> Self {
        self.kappa_range = (min, max);
        self
    }

    /// Sets the number of `κ` candidates.
    #[must_use]
    pub fn with_kappa_steps(mut self, steps: usize) -> Self {
        self.kappa_steps = steps;
        self
    }

    /// Sets the bandwidth rule.
    #[must_use]
    pub fn with_rule(mut self, rule: BandwidthRule) -> Self {
        self.rule = rule;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(kappa) = self.kappa {
            if !(kappa > 0.0 && kappa.is_finite()) {
                return Err(Error::InvalidConcentration(kappa));
            }
            return Ok(());
        }
        if !self.estimate {
            return Err(Error::MissingConcentration);
        }
        let (min, max) = self.kappa_range;
        if !(min > 0.0 && min.is_finite()) {
            return Err(Error::InvalidConcentration(min));
        }
        if !(max >= min && max.is_finite()) {
            return Err(Error::InvalidConcentration(max));
        }
        if self.kappa_steps == 0 {
            return Err(Error::InvalidGridSize(0));
        }
        Ok(())
    }
}

/// A von Mises KDE on a periodic domain.
///
/// [`FittedDensity::evaluate`] renormalizes its output so that it integrates
/// to one over the query grid; [`CircularKde::pdf`] is the unnormalized
/// estimate in the original units.
///
/// # Examples
///
/// ```
/// use posterior_jsd::kde::{CircularConfig, CircularKde, FittedDensity};
///
/// let samples = [0.1, 0.2, 6.2, 6.1, 0.05];
/// let two_pi = 2.0 * std::f64::consts::PI;
/// let kde = CircularKde::fit(&samples, Some(0.0), Some(two_pi), &CircularConfig::default()).unwrap();
///
/// // Mass near 0 wraps around to the upper end of the period
/// assert!(kde.pdf(two_pi - 0.05) > kde.pdf(std::f64::consts::PI));
/// ```
#[derive(Clone, Debug)]
pub struct CircularKde {
    lower: f64,
    period: f64,
    /// Sample angles on `[-π, π)`.
    angles: Vec<f64>,
    kappa: f64,
    nu: f64,
}

impl CircularKde {
    /// Fits the estimator.
    ///
    /// Non-finite samples are dropped. Zero-width bounds, or nothing left
    /// after dropping, give a density that is zero everywhere.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingBounds` unless both bounds are given,
    /// `Error::InvalidBounds` if `lower > upper`, and `Error::EmptySamples`
    /// for an empty sample set. The configuration is checked before any
    /// estimation: a non-positive fixed `κ` or search range gives
    /// `Error::InvalidConcentration`, no `κ` with estimation disabled gives
    /// `Error::MissingConcentration`.
    pub fn fit(
        samples: &[f64],
        lower: Option<f64>,
        upper: Option<f64>,
        config: &CircularConfig,
    ) -> Result<Self> {
        let (Some(lower), Some(upper)) = (lower, upper) else {
            return Err(Error::MissingBounds {
                boundary: "periodic",
                requirement: "both a lower and an upper bound",
            });
        };
        if lower > upper {
            return Err(Error::InvalidBounds { lower, upper });
        }
        if samples.is_empty() {
            return Err(Error::EmptySamples);
        }
        config.validate()?;

        let period = upper - lower;
        if !(period > 0.0 && period.is_finite()) {
            trace_debug!(lower, upper, "degenerate period, density is zero");
            return Ok(Self::zero(lower, period));
        }

        let angles: Vec<f64> = samples
            .iter()
            .filter(|x| x.is_finite())
            .map(|&x| to_angle(x, lower, period))
            .collect();
        if angles.is_empty() {
            return Ok(Self::zero(lower, period));
        }

        let kappa = match config.kappa {
            Some(kappa) => kappa,
            None => estimate_kappa(&angles, config.kappa_range, config.kappa_steps),
        };
        let nu = concentration(kappa, angles.len(), config.rule);
        trace_debug!(kappa, nu, samples = angles.len(), "fitted circular KDE");

        Ok(Self {
            lower,
            period,
            angles,
            kappa,
            nu,
        })
    }

    fn zero(lower: f64, period: f64) -> Self {
        Self {
            lower,
            period,
            angles: Vec::new(),
            kappa: f64::NAN,
            nu: f64::NAN,
        }
    }

    /// The von Mises concentration the bandwidth was derived from.
    #[must_use]
    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    /// The kernel concentration.
    #[must_use]
    pub fn nu(&self) -> f64 {
        self.nu
    }

    /// Density at `x` in the original units, integrating to one over a
    /// full period.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn pdf(&self, x: f64) -> f64 {
        if self.angles.is_empty() {
            return 0.0;
        }
        let theta = to_angle(x, self.lower, self.period);
        let norm = 2.0 * PI * bessel_i_scaled(0, self.nu);
        let sum: f64 = self
            .angles
            .iter()
            .map(|&mu| (self.nu * ((theta - mu).cos() - 1.0)).exp())
            .sum();
        let density = sum / (norm * self.angles.len() as f64) * (2.0 * PI / self.period);
        if density.is_finite() { density } else { 0.0 }
    }
}

impl FittedDensity for CircularKde {
    fn evaluate(&self, points: &[f64]) -> Vec<f64> {
        let density: Vec<f64> = points.iter().map(|&x| self.pdf(x)).collect();
        if points.len() < 2 {
            return density;
        }
        let integral = stats::trapezoid(&density, points);
        if !(integral > 0.0 && integral.is_finite()) {
            return density;
        }
        density
            .into_iter()
            .map(|d| {
                let d = d / integral;
                if d.is_finite() { d } else { 0.0 }
            })
            .collect()
    }
}

/// `2π (x - lower) / period - π`.
fn to_angle(x: f64, lower: f64, period: f64) -> f64 {
    2.0 * PI * (x - lower) / period - PI
}

/// Grid search for the `κ` whose expected resultant length `I₁(κ)/I₀(κ)`
/// best matches the samples' mean resultant length.
///
/// This is a moment-matching loss around a single mean direction, not a
/// per-`κ` integrated squared error.
pub(crate) fn estimate_kappa(angles: &[f64], range: (f64, f64), steps: usize) -> f64 {
    let (sin_sum, cos_sum) = angles
        .iter()
        .fold((0.0, 0.0), |(s, c), &t| (s + t.sin(), c + t.cos()));
    let mean_direction = sin_sum.atan2(cos_sum);
    let resultant =
        stats::mean(&angles.iter().map(|t| (t - mean_direction).cos()).collect::<Vec<_>>());

    stats::linspace(range.0, range.1, steps)
        .into_iter()
        .map(|kappa| (kappa, (von_mises_resultant_length(kappa) - resultant).powi(2)))
        .filter(|(_, loss)| loss.is_finite())
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(range.0, |(kappa, _)| kappa)
}

/// Kernel concentration `ν` for `n` samples, computed in log space.
///
/// The exponential factors of the scaled Bessel functions cancel in both
/// rules, so large `κ` does not overflow.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn concentration(kappa: f64, n: usize, rule: BandwidthRule) -> f64 {
    let ln_n = (n as f64).ln();
    let ln_i0_sq = 2.0 * bessel_i_scaled(0, kappa).ln();
    match rule {
        BandwidthRule::Taylor => {
            let ln_i2 = bessel_i_scaled(2, 2.0 * kappa).ln();
            let ln_nu = 0.4
                * (3.0f64.ln() + ln_n + 2.0 * kappa.ln() + ln_i2
                    - 4.0f64.ln()
                    - HALF_LN_PI
                    - ln_i0_sq);
            ln_nu.exp()
        }
        BandwidthRule::RuleOfThumb => {
            let mix = 2.0 * bessel_i_scaled(1, 2.0 * kappa)
                + 3.0 * kappa * bessel_i_scaled(2, 2.0 * kappa);
            let ln_h = 0.2 * (4.0f64.ln() + HALF_LN_PI + ln_i0_sq - kappa.ln() - ln_n - mix.ln());
            (-2.0 * ln_h).exp()
        }
    }
}
