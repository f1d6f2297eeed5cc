use std::f64::consts::PI;

use posterior_jsd::kde::{
    BandwidthRule, CircularConfig, CircularKde, FittedDensity, KdeConfig, PeriodicMethod,
    fit_density,
};
use posterior_jsd::{BoundaryType, Domain, Error};

use super::{grid, normal_samples, trapezoid, uniform_samples};

const TWO_PI: f64 = 2.0 * PI;

fn von_mises_config() -> KdeConfig {
    KdeConfig {
        periodic: PeriodicMethod::VonMises,
        ..KdeConfig::default()
    }
}

#[test]
fn both_rules_integrate_to_one_over_a_period() {
    let samples = normal_samples(800, 2.0, 0.5, 21);
    let x = grid(0.0, TWO_PI, 4001);
    for rule in [BandwidthRule::RuleOfThumb, BandwidthRule::Taylor] {
        let config = CircularConfig::default().with_rule(rule);
        let kde = CircularKde::fit(&samples, Some(0.0), Some(TWO_PI), &config).unwrap();
        let y: Vec<f64> = x.iter().map(|&v| kde.pdf(v)).collect();
        let integral = trapezoid(&y, &x);
        assert!((integral - 1.0).abs() < 1e-3, "{rule:?}: integral = {integral}");
    }
}

#[test]
fn mode_follows_the_samples() {
    let samples = normal_samples(1500, PI, 0.3, 22);
    let kde = CircularKde::fit(&samples, Some(0.0), Some(TWO_PI), &CircularConfig::default())
        .unwrap();
    let x = grid(0.0, TWO_PI, 629);
    let density = kde.evaluate(&x);
    let (mode, _) = x
        .iter()
        .zip(&density)
        .max_by(|a, b| a.1.total_cmp(b.1))
        .unwrap();
    assert!((mode - PI).abs() < 0.15, "mode at {mode}");
}

#[test]
fn fixed_kappa_is_used_as_given() {
    let samples = uniform_samples(300, 0.0, 1.0, 23);
    let config = CircularConfig::default().with_kappa(4.0);
    let kde = CircularKde::fit(&samples, Some(0.0), Some(1.0), &config).unwrap();
    assert_eq!(kde.kappa(), 4.0);
    assert!(kde.nu() > 0.0 && kde.nu().is_finite());
}

#[test]
fn uniform_angles_give_a_flat_density() {
    let samples = uniform_samples(4000, -1.0, 1.0, 24);
    let kde = CircularKde::fit(&samples, Some(-1.0), Some(1.0), &CircularConfig::default())
        .unwrap();
    for xi in grid(-1.0, 1.0, 21) {
        let d = kde.pdf(xi);
        assert!((d - 0.5).abs() < 0.1, "density at {xi} = {d}");
    }
}

#[test]
fn fit_density_dispatches_periodic_domains() {
    let samples = normal_samples(500, 1.0, 0.4, 25);
    let domain = Domain::new(Some(0.0), Some(TWO_PI), Some(BoundaryType::Periodic)).unwrap();
    let x = grid(0.0, TWO_PI, 200);

    let density = fit_density(&samples, &domain, &von_mises_config()).unwrap();
    let direct = CircularKde::fit(&samples, Some(0.0), Some(TWO_PI), &CircularConfig::default())
        .unwrap();
    assert_eq!(density.evaluate(&x), direct.evaluate(&x));

    let integral = trapezoid(&density.evaluate(&x), &x);
    assert!((integral - 1.0).abs() < 1e-9, "integral = {integral}");
}

#[test]
fn disabled_estimation_needs_a_kappa() {
    let domain = Domain::new(Some(0.0), Some(1.0), Some(BoundaryType::Periodic)).unwrap();
    let mut config = von_mises_config();
    config.circular = CircularConfig::default().with_estimate(false);
    assert!(matches!(
        fit_density(&[0.2, 0.4], &domain, &config),
        Err(Error::MissingConcentration)
    ));

    config.circular = config.circular.with_kappa(2.0);
    assert!(fit_density(&[0.2, 0.4], &domain, &config).is_ok());
}

#[test]
fn invalid_search_range_is_rejected() {
    let config = CircularConfig::default().with_kappa_range(0.0, 10.0);
    assert!(matches!(
        CircularKde::fit(&[0.1], Some(0.0), Some(1.0), &config),
        Err(Error::InvalidConcentration(_))
    ));
    let config = CircularConfig::default().with_kappa_steps(0);
    assert!(matches!(
        CircularKde::fit(&[0.1], Some(0.0), Some(1.0), &config),
        Err(Error::InvalidGridSize(0))
    ));
}

#[test]
fn non_finite_samples_are_dropped() {
    let clean = [0.2, 0.25, 0.3, 0.7];
    let dirty = [0.2, f64::NAN, 0.25, f64::INFINITY, 0.3, 0.7];
    let config = CircularConfig::default();
    let a = CircularKde::fit(&clean, Some(0.0), Some(1.0), &config).unwrap();
    let b = CircularKde::fit(&dirty, Some(0.0), Some(1.0), &config).unwrap();
    let x = grid(0.0, 1.0, 11);
    assert_eq!(a.evaluate(&x), b.evaluate(&x));
}
