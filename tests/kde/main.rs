#![allow(clippy::cast_precision_loss)]

mod bounded;
mod circular;

/// `n` draws from `Uniform[low, high)`.
fn uniform_samples(n: usize, low: f64, high: f64, seed: u64) -> Vec<f64> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..n).map(|_| low + rng.f64() * (high - low)).collect()
}

/// `n` draws from `Normal(mean, sd)` by Box-Muller.
fn normal_samples(n: usize, mean: f64, sd: f64, seed: u64) -> Vec<f64> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..n)
        .map(|_| {
            let u1 = rng.f64().max(f64::MIN_POSITIVE);
            let u2 = rng.f64();
            mean + sd * (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
        })
        .collect()
}

/// `n` evenly spaced points on `[start, end]`.
fn grid(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Trapezoidal integral of `y` over `x`.
fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    y.windows(2)
        .zip(x.windows(2))
        .map(|(yw, xw)| 0.5 * (xw[1] - xw[0]) * (yw[0] + yw[1]))
        .sum()
}
