//! Special functions used by the boundary transforms and the circular KDE.
//!
//! - Gaussian CDF and its inverse, each paired with the log-absolute
//!   Jacobian of the map. Both go through the complementary error function
//!   so that values close to 0 and 1 keep their precision.
//! - Exponentially scaled modified Bessel functions of the first kind,
//!   `e^{-|x|} I_n(x)`, which stay finite for the large concentrations that
//!   show up in von Mises bandwidth selection.

use core::f64::consts::{PI, SQRT_2};

use statrs::function::erf::{erfc, erfc_inv};

/// `0.5 * ln(2π)`.
const HALF_LN_2PI: f64 = 0.918_938_533_204_672_8;

/// Switch-over point between the power series and the asymptotic expansion.
const BESSEL_SERIES_LIMIT: f64 = 20.0;

/// Standard normal CDF of every value together with `ln |dΦ/dx|`.
#[must_use]
pub fn gaussian_cdf(values: &[f64]) -> (Vec<f64>, Vec<f64>) {
    values
        .iter()
        .map(|&x| (0.5 * erfc(-x / SQRT_2), -HALF_LN_2PI - 0.5 * x * x))
        .unzip()
}

/// Inverse standard normal CDF of every value together with `ln |dΦ⁻¹/du|`.
///
/// Values of exactly 0 or 1 map to `∓∞`; callers decide how to treat them.
#[must_use]
pub fn inverse_gaussian_cdf(values: &[f64]) -> (Vec<f64>, Vec<f64>) {
    values
        .iter()
        .map(|&u| {
            let x = -SQRT_2 * erfc_inv(2.0 * u);
            (x, HALF_LN_2PI + 0.5 * x * x)
        })
        .unzip()
}

/// Exponentially scaled modified Bessel function of the first kind,
/// `e^{-|x|} I_n(x)`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn bessel_i_scaled(order: u32, x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    let ax = x.abs();
    let value = if ax <= BESSEL_SERIES_LIMIT {
        bessel_i_series(order, ax) * (-ax).exp()
    } else {
        bessel_i_asymptotic(order, ax)
    };
    if x < 0.0 && order % 2 == 1 { -value } else { value }
}

/// Natural logarithm of `I_n(x)` for `x > 0`.
#[must_use]
pub fn ln_bessel_i(order: u32, x: f64) -> f64 {
    bessel_i_scaled(order, x).ln() + x.abs()
}

/// Mean resultant length of a von Mises distribution, `I_1(κ) / I_0(κ)`.
#[must_use]
pub fn von_mises_resultant_length(kappa: f64) -> f64 {
    bessel_i_scaled(1, kappa) / bessel_i_scaled(0, kappa)
}

/// Power series `Σ (x/2)^{2k+n} / (k! (k+n)!)`; all terms are positive.
#[allow(clippy::cast_precision_loss)]
fn bessel_i_series(order: u32, x: f64) -> f64 {
    let half = 0.5 * x;
    let n = f64::from(order);
    let mut term = (1..=order).fold(1.0, |acc, k| acc * half / f64::from(k));
    let quarter_sq = half * half;
    let mut sum = term;
    for k in 1..500 {
        let k = k as f64;
        term *= quarter_sq / (k * (k + n));
        sum += term;
        if term <= sum * 1e-17 {
            break;
        }
    }
    sum
}

/// Large-argument expansion of `e^{-x} I_n(x)`, truncated at the smallest term.
#[allow(clippy::cast_precision_loss)]
fn bessel_i_asymptotic(order: u32, x: f64) -> f64 {
    let mu = 4.0 * f64::from(order) * f64::from(order);
    let eight_x = 8.0 * x;
    let mut term = 1.0;
    let mut sum = 1.0;
    for k in 1..60 {
        let odd = (2 * k - 1) as f64;
        let next = -term * (mu - odd * odd) / (k as f64 * eight_x);
        if next.abs() >= term.abs() {
            break;
        }
        term = next;
        sum += term;
        if term.abs() <= sum.abs() * 1e-17 {
            break;
        }
    }
    sum / (2.0 * PI * x).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaussian_cdf_known_values() {
        let (u, _) = gaussian_cdf(&[0.0, 1.0, -1.959_963_984_540_054]);
        assert!((u[0] - 0.5).abs() < 1e-15);
        assert!((u[1] - 0.841_344_746_068_542_9).abs() < 1e-12);
        assert!((u[2] - 0.025).abs() < 1e-12);
    }

    #[test]
    fn inverse_gaussian_cdf_round_trip() {
        let x = [-6.0, -2.5, -0.3, 0.0, 0.7, 3.1, 7.5];
        let (u, log_fwd) = gaussian_cdf(&x);
        let (back, log_inv) = inverse_gaussian_cdf(&u);
        for i in 0..x.len() {
            assert!((back[i] - x[i]).abs() < 1e-8, "{} -> {}", x[i], back[i]);
            // Jacobians of a map and its inverse cancel
            assert!((log_fwd[i] + log_inv[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn inverse_gaussian_cdf_keeps_tail_precision() {
        let (x, _) = inverse_gaussian_cdf(&[1e-300, 1.0 - 1e-16]);
        assert!(x[0].is_finite() && x[0] < -37.0);
        assert!(x[1].is_finite() && x[1] > 8.0);
    }

    #[test]
    fn inverse_gaussian_cdf_edges_are_infinite() {
        let (x, _) = inverse_gaussian_cdf(&[0.0, 1.0]);
        assert!(x[0].is_infinite() && x[0] < 0.0);
        assert!(x[1].is_infinite() && x[1] > 0.0);
    }

    #[test]
    fn bessel_small_arguments() {
        assert!((bessel_i_scaled(0, 0.0) - 1.0).abs() < 1e-15);
        assert!(bessel_i_scaled(1, 0.0).abs() < 1e-15);
        assert!(bessel_i_scaled(2, 0.0).abs() < 1e-15);
        // I_0(1) = 1.2660658777520082, I_1(1) = 0.5651591039924851, I_2(1) = 0.1357476697670383
        let e = (-1.0f64).exp();
        assert!((bessel_i_scaled(0, 1.0) - 1.266_065_877_752_008_2 * e).abs() < 1e-14);
        assert!((bessel_i_scaled(1, 1.0) - 0.565_159_103_992_485_1 * e).abs() < 1e-14);
        assert!((bessel_i_scaled(2, 1.0) - 0.135_747_669_767_038_3 * e).abs() < 1e-14);
    }

    #[test]
    fn bessel_branches_agree_at_switch_over() {
        for order in 0..=2 {
            let below = bessel_i_series(order, BESSEL_SERIES_LIMIT) * (-BESSEL_SERIES_LIMIT).exp();
            let above = bessel_i_asymptotic(order, BESSEL_SERIES_LIMIT);
            assert!(
                ((below - above) / below).abs() < 1e-10,
                "order {order}: {below} vs {above}"
            );
        }
    }

    #[test]
    fn bessel_large_argument_stays_finite() {
        let v = bessel_i_scaled(0, 1e4);
        let expected = 1.0 / (2.0 * PI * 1e4).sqrt();
        assert!(((v - expected) / expected).abs() < 1e-4);
        assert!(ln_bessel_i(2, 2000.0).is_finite());
    }

    #[test]
    fn bessel_parity() {
        assert!((bessel_i_scaled(1, -2.0) + bessel_i_scaled(1, 2.0)).abs() < 1e-15);
        assert!((bessel_i_scaled(2, -2.0) - bessel_i_scaled(2, 2.0)).abs() < 1e-15);
    }

    #[test]
    fn resultant_length_is_monotone() {
        let mut last = 0.0;
        for kappa in [0.01, 0.1, 1.0, 5.0, 50.0, 500.0] {
            let a = von_mises_resultant_length(kappa);
            assert!(a > last && a < 1.0);
            last = a;
        }
    }
}
