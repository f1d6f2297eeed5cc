//! Jensen-Shannon divergence between two fitted densities.
//!
//! Both densities are evaluated on a shared grid spanning the overlap of the
//! two sample sets' observed ranges. The density vectors are normalized to
//! probability vectors, and the divergence is the square of the
//! Jensen-Shannon distance between them.

use crate::domain::Domain;
use crate::error::Result;
use crate::kde::{FittedDensity, KdeConfig, fit_density};
use crate::stats;

/// Jensen-Shannon distance between two non-negative weight vectors, with
/// logarithms in `base`.
///
/// Both vectors are normalized to sum to one first. The result is `NaN`
/// when either vector sums to zero.
///
/// # Examples
///
/// ```
/// use posterior_jsd::divergence::jensen_shannon_distance;
///
/// let d = jensen_shannon_distance(&[1.0, 0.0], &[0.0, 1.0], 2.0);
/// assert!((d - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn jensen_shannon_distance(p: &[f64], q: &[f64], base: f64) -> f64 {
    let p_sum: f64 = p.iter().sum();
    let q_sum: f64 = q.iter().sum();

    let js: f64 = p
        .iter()
        .zip(q)
        .map(|(&pi, &qi)| {
            let pi = pi / p_sum;
            let qi = qi / q_sum;
            let m = 0.5 * (pi + qi);
            relative_entropy(pi, m) + relative_entropy(qi, m)
        })
        .sum::<f64>()
        / 2.0;

    (js / base.ln()).sqrt()
}

/// Elementwise `x ln(x / y)` with the conventions `0 ln(0 / y) = 0` and
/// `x ln(x / 0) = ∞`.
fn relative_entropy(x: f64, y: f64) -> f64 {
    if x > 0.0 && y > 0.0 {
        x * (x / y).ln()
    } else if x == 0.0 && y >= 0.0 {
        0.0
    } else {
        f64::INFINITY
    }
}

/// Jensen-Shannon divergence between two densities on `grid`.
///
/// Non-finite results (an all-zero density, for instance) are reported as
/// `0.0`.
#[must_use]
pub fn divergence(a: &dyn FittedDensity, b: &dyn FittedDensity, grid: &[f64], base: f64) -> f64 {
    let pa = a.evaluate(grid);
    let pb = b.evaluate(grid);
    let jsd = jensen_shannon_distance(&pa, &pb, base).powi(2);
    if jsd.is_finite() { jsd } else { 0.0 }
}

/// `n` evenly spaced points from `max(min a, min b)` to
/// `min(max a, max b)`.
#[must_use]
pub fn overlap_grid(a: &[f64], b: &[f64], n: usize) -> Vec<f64> {
    let (a_min, a_max) = finite_range(a);
    let (b_min, b_max) = finite_range(b);
    stats::linspace(a_min.max(b_min), a_max.min(b_max), n)
}

fn finite_range(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Fits both sample sets on `domain` and returns their divergence on the
/// overlap grid.
///
/// # Errors
///
/// Propagates fitting errors from [`fit_density`].
pub fn replicate_divergence(
    a: &[f64],
    b: &[f64],
    domain: &Domain,
    kde: &KdeConfig,
    grid_points: usize,
    base: f64,
) -> Result<f64> {
    let density_a = fit_density(a, domain, kde)?;
    let density_b = fit_density(b, domain, kde)?;
    let grid = overlap_grid(a, b, grid_points);
    Ok(divergence(density_a.as_ref(), density_b.as_ref(), &grid, base))
}
