/// Draws `k` distinct indices from `0..n` by a partial Fisher-Yates shuffle.
///
/// `k` is clamped to `n`.
pub(crate) fn partial_shuffle(n: usize, k: usize, rng: &mut fastrand::Rng) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    let k = k.min(n);
    for i in 0..k {
        let j = rng.usize(i..n);
        indices.swap(i, j);
    }
    indices.truncate(k);
    indices
}

/// Draws `k` values from `values` without replacement.
#[inline]
pub(crate) fn subsample(values: &[f64], k: usize, rng: &mut fastrand::Rng) -> Vec<f64> {
    partial_shuffle(values.len(), k, rng)
        .into_iter()
        .map(|i| values[i])
        .collect()
}
