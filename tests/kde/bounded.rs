use posterior_jsd::kde::{Bandwidth, BoundedKde, FittedDensity, KdeConfig, fit_density};
use posterior_jsd::transform::BoundaryTransform;
use posterior_jsd::{BoundaryType, Domain, Error};

use super::{grid, normal_samples, trapezoid, uniform_samples};

fn fit(samples: &[f64], lower: f64, upper: f64, boundary: BoundaryType) -> BoundedKde {
    let domain = Domain::new(Some(lower), Some(upper), Some(boundary)).unwrap();
    BoundedKde::fit(samples, &domain, Bandwidth::Silverman).unwrap()
}

#[test]
fn unit_interval_recovers_uniform_density() {
    let samples = uniform_samples(5000, 0.0, 1.0, 42);
    let kde = fit(&samples, 0.0, 1.0, BoundaryType::UnitInterval);

    let x = grid(0.1, 0.9, 81);
    let density = kde.evaluate(&x);
    for (xi, d) in x.iter().zip(&density) {
        assert!((d - 1.0).abs() < 0.15, "density at {xi} = {d}");
    }
    let mean = density.iter().sum::<f64>() / density.len() as f64;
    assert!((mean - 1.0).abs() < 0.05, "mean density {mean}");
}

#[test]
fn probit_recovers_uniform_density() {
    let samples = uniform_samples(5000, 2.0, 4.0, 7);
    let kde = fit(&samples, 2.0, 4.0, BoundaryType::Bounded);

    let x = grid(2.2, 3.8, 41);
    for (xi, d) in x.iter().zip(kde.evaluate(&x)) {
        assert!((d - 0.5).abs() < 0.1, "density at {xi} = {d}");
    }
}

#[test]
fn reflective_keeps_density_flat_up_to_the_bounds() {
    let samples = uniform_samples(5000, 0.0, 1.0, 11);
    let kde = fit(&samples, 0.0, 1.0, BoundaryType::Reflective);

    let x = grid(0.0, 1.0, 101);
    let density = kde.evaluate(&x);
    assert!(density[0] > 0.8, "density at lower bound {}", density[0]);
    assert!(density[100] > 0.8, "density at upper bound {}", density[100]);
    let integral = trapezoid(&density, &x);
    assert!((integral - 1.0).abs() < 0.02, "integral = {integral}");
}

#[test]
fn one_sided_reflection() {
    // Half-normal: reflecting at zero doubles the density there
    let samples: Vec<f64> = normal_samples(4000, 0.0, 1.0, 5)
        .into_iter()
        .map(f64::abs)
        .collect();
    let domain = Domain::new(Some(0.0), None, Some(BoundaryType::Reflective)).unwrap();
    let kde = BoundedKde::fit(&samples, &domain, Bandwidth::Silverman).unwrap();
    let expected = (2.0 / std::f64::consts::PI).sqrt();
    let d0 = kde.evaluate(&[0.0])[0];
    assert!((d0 - expected).abs() < 0.1, "density at 0 = {d0}, expected {expected}");
}

#[test]
fn periodic_augmentation_wraps_density() {
    // Mass piled at both ends of the period is one mode across the seam
    let samples: Vec<f64> = normal_samples(3000, 0.0, 0.5, 13)
        .into_iter()
        .map(|x| x.rem_euclid(6.0))
        .collect();
    let kde = fit(&samples, 0.0, 6.0, BoundaryType::Periodic);

    let ends = kde.evaluate(&[0.0, 6.0, 3.0]);
    assert!((ends[0] - ends[1]).abs() < 1e-9);
    assert!(ends[0] > 0.4, "density at the seam {}", ends[0]);
    assert!(ends[2] < 0.01, "density opposite the seam {}", ends[2]);

    let x = grid(0.0, 6.0, 3001);
    let integral = trapezoid(&kde.evaluate(&x), &x);
    assert!((integral - 1.0).abs() < 0.01, "integral = {integral}");
}

#[test]
fn densities_are_finite_and_non_negative() {
    let samples = uniform_samples(500, 0.0, 1.0, 3);
    let x = grid(-0.5, 1.5, 201);
    for boundary in [
        BoundaryType::None,
        BoundaryType::UnitInterval,
        BoundaryType::Bounded,
        BoundaryType::Reflective,
        BoundaryType::Periodic,
    ] {
        let domain = Domain::new(Some(0.0), Some(1.0), Some(boundary)).unwrap();
        let density = fit_density(&samples, &domain, &KdeConfig::default()).unwrap();
        for d in density.evaluate(&x) {
            assert!(d.is_finite() && d >= 0.0, "{boundary}: {d}");
        }
    }
}

#[test]
fn widened_bounds_keep_boundary_samples() {
    // Samples exactly on the bounds are dropped by the probit map unless the
    // bounds are widened
    let mut samples = uniform_samples(500, 0.0, 1.0, 17);
    samples.extend([0.0, 1.0]);
    let domain = Domain::new(Some(0.0), Some(1.0), Some(BoundaryType::Bounded))
        .unwrap()
        .widened(1e-6);
    let kde = BoundedKde::fit(&samples, &domain, Bandwidth::Silverman).unwrap();
    let d = kde.evaluate(&[0.0, 0.5, 1.0]);
    assert!(d.iter().all(|v| v.is_finite() && *v > 0.0), "{d:?}");
}

#[test]
fn fixed_bandwidth_is_validated() {
    let domain = Domain::new(Some(0.0), Some(1.0), Some(BoundaryType::Reflective)).unwrap();
    let result = BoundedKde::fit(&[0.5], &domain, Bandwidth::Fixed(0.0));
    assert!(matches!(result, Err(Error::InvalidBandwidth(_))));
}

#[test]
fn transforms_round_trip() {
    let x = grid(0.01, 0.99, 50);
    for boundary in [BoundaryType::UnitInterval, BoundaryType::Bounded] {
        let domain = Domain::new(Some(0.0), Some(1.0), Some(boundary)).unwrap();
        let transform = BoundaryTransform::from_domain(&domain);
        let forward = transform.transform(&x);
        let back = transform.inverse_transform(&forward.values);
        for (a, b) in x.iter().zip(&back.values) {
            assert!((a - b).abs() < 1e-12, "{boundary}: {a} -> {b}");
        }
        // The forward and inverse Jacobians cancel
        for (f, i) in forward.log_abs_det.iter().zip(&back.log_abs_det) {
            assert!((f + i).abs() < 1e-9, "{boundary}: {f} + {i}");
        }
    }
}

#[test]
fn probit_jacobian_is_sum_of_stages() {
    let domain = Domain::new(Some(1.0), Some(3.0), Some(BoundaryType::Bounded)).unwrap();
    let probit = BoundaryTransform::from_domain(&domain).transform(&[1.5, 2.0, 2.9]);
    let unit = BoundaryTransform::UnitInterval {
        lower: 1.0,
        width: 2.0,
    }
    .transform(&[1.5, 2.0, 2.9]);
    let (_, log_gauss) = posterior_jsd::special::inverse_gaussian_cdf(&unit.values);
    for i in 0..3 {
        assert!((probit.log_abs_det[i] - (unit.log_abs_det[i] + log_gauss[i])).abs() < 1e-12);
    }
}
