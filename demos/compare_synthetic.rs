//! Compare two synthetic inference results parameter by parameter.
//!
//! Builds two in-memory results with a bounded spin, a periodic angle, and
//! an unbounded mass whose second posterior is shifted, then prints the
//! divergence of each parameter. Divergences are in bits.
//!
//! Run with: `cargo run --example compare_synthetic`

use posterior_jsd::prelude::*;

fn normal(rng: &mut fastrand::Rng, mean: f64, sd: f64) -> f64 {
    let u1 = rng.f64().max(f64::MIN_POSITIVE);
    let u2 = rng.f64();
    mean + sd * (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

fn synthetic(label: &str, mass_shift: f64, seed: u64) -> MemoryResult {
    let mut rng = fastrand::Rng::with_seed(seed);
    let two_pi = 2.0 * std::f64::consts::PI;
    let n = 5000;

    let mut posterior = Posterior::new();
    posterior.insert("a_1", (0..n).map(|_| rng.f64().powi(2) * 0.99).collect());
    posterior.insert(
        "psi",
        (0..n).map(|_| normal(&mut rng, 0.3, 0.4).rem_euclid(two_pi)).collect(),
    );
    posterior.insert(
        "chirp_mass",
        (0..n).map(|_| normal(&mut rng, 30.0 + mass_shift, 1.5)).collect(),
    );

    let mut priors = PriorSet::new();
    priors.insert("a_1", PriorRecord::new(0.0, 0.99, Some(BoundaryType::Reflective)));
    priors.insert("psi", PriorRecord::new(0.0, two_pi, Some(BoundaryType::Periodic)));
    priors.insert(
        "chirp_mass",
        PriorRecord {
            minimum: None,
            maximum: None,
            boundary: Some(BoundaryType::None),
        },
    );
    MemoryResult::new(label, posterior, priors)
}

fn main() -> posterior_jsd::Result<()> {
    let first = synthetic("reference", 0.0, 1);
    let second = synthetic("shifted", 1.0, 2);

    let estimator = JsdEstimator::builder()
        .n_tests(10)
        .n_samples(2000)
        .seed(1234)
        .n_workers(4)
        .build()?;

    let report = compare(&first, &second, &["a_1", "psi", "chirp_mass"], &estimator)?;

    println!("{} vs {}", report.res1, report.res2);
    for (name, result) in &report.jsd {
        match result {
            DivergenceResult::Summary(s) => println!(
                "  {name:<12} {:.5} +{:.5} -{:.5}",
                s.median, s.plus, s.minus
            ),
            other => println!("  {name:<12} {:.5}", other.central()),
        }
    }

    let von_mises = JsdEstimator::builder()
        .n_tests(10)
        .n_samples(2000)
        .seed(1234)
        .kde(KdeConfig {
            periodic: PeriodicMethod::VonMises,
            ..KdeConfig::default()
        })
        .build()?;
    let psi = compare(&first, &second, &["psi"], &von_mises)?;
    println!("  psi (von Mises) {:.5}", psi.jsd["psi"].central());

    Ok(())
}
