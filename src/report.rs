//! Parameter-by-parameter comparison of two inference results.
//!
//! [`compare`] checks that both results share the same prior metadata, then
//! runs the [`JsdEstimator`] on every requested parameter present in both
//! posteriors, and collects the results into a [`JsdReport`].
//!
//! # Examples
//!
//! ```
//! use posterior_jsd::posterior::{MemoryResult, Posterior};
//! use posterior_jsd::prior::{PriorRecord, PriorSet};
//! use posterior_jsd::{JsdEstimator, compare};
//!
//! let mut priors = PriorSet::new();
//! priors.insert("a_1", PriorRecord::new(0.0, 1.0, None));
//!
//! let samples: Vec<f64> = (1..400).map(|i| f64::from(i) / 400.0).collect();
//! let mut posterior = Posterior::new();
//! posterior.insert("a_1", samples);
//!
//! let first = MemoryResult::new("first", posterior.clone(), priors.clone());
//! let second = MemoryResult::new("second", posterior, priors);
//!
//! let estimator = JsdEstimator::builder().n_tests(2).n_samples(200).grid_points(100).seed(1).build().unwrap();
//! let report = compare(&first, &second, &["a_1", "a_2"], &estimator).unwrap();
//!
//! assert_eq!(report.jsd.len(), 1);
//! assert_eq!(report.seed, Some(1));
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::estimator::JsdEstimator;
use crate::persistence;
use crate::posterior::{JsonResultFile, ResultSource};
use crate::result::DivergenceResult;

/// Parameters compared when the caller has no list of its own.
pub const DEFAULT_PARAMETERS: &[&str] = &[
    "chirp_mass",
    "mass_ratio",
    "a_1",
    "a_2",
    "tilt_1",
    "tilt_2",
    "phi_12",
    "phi_jl",
    "luminosity_distance",
    "dec",
    "ra",
    "theta_jn",
    "psi",
    "geocent_time",
    "lambda_1",
    "lambda_2",
    "chi_1",
    "chi_2",
];

/// Persisted outcome of a comparison.
///
/// `seed`, `n_samples` and `n_tests` are `None` (serialized as `null`) when
/// the divergences were produced by an external routine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JsdReport {
    /// Identifier of the first result.
    pub res1: String,
    /// Identifier of the second result.
    pub res2: String,
    /// Logarithm base of the divergences.
    pub base: f64,
    /// Seed of the subsampling generator.
    pub seed: Option<u64>,
    /// Requested subsample size per replicate.
    pub n_samples: Option<usize>,
    /// Replicates per parameter.
    pub n_tests: Option<usize>,
    /// Divergence per parameter.
    pub jsd: BTreeMap<String, DivergenceResult>,
}

impl JsdReport {
    /// A report for divergences computed outside this crate.
    #[must_use]
    pub fn delegated(
        res1: impl Into<String>,
        res2: impl Into<String>,
        base: f64,
        jsd: BTreeMap<String, DivergenceResult>,
    ) -> Self {
        Self {
            res1: res1.into(),
            res2: res2.into(),
            base,
            seed: None,
            n_samples: None,
            n_tests: None,
            jsd,
        }
    }

    /// Writes the report as pretty-printed JSON, creating missing parent
    /// directories.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` or `Error::Serialization` if the file cannot be
    /// written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        persistence::save_json(path.as_ref(), self)
    }

    /// Reads a report written by [`JsdReport::save`].
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` or `Error::Serialization` if the file cannot be
    /// read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        persistence::load_json(path.as_ref())
    }
}

/// Compares two results parameter by parameter.
///
/// One generator, seeded from the estimator's seed, is advanced across all
/// parameters in the order given. Parameters missing from either posterior
/// or from the priors are skipped.
///
/// # Errors
///
/// Returns `Error::PriorMismatch` if the two results have different prior
/// metadata; this is checked before any samples are loaded. Propagates
/// loading and estimation errors.
pub fn compare<A, B>(
    first: &A,
    second: &B,
    parameters: &[&str],
    estimator: &JsdEstimator,
) -> Result<JsdReport>
where
    A: ResultSource + ?Sized,
    B: ResultSource + ?Sized,
{
    let priors = first.priors()?;
    if priors != second.priors()? {
        return Err(Error::PriorMismatch);
    }

    let post1 = first.posterior(parameters)?;
    let post2 = second.posterior(parameters)?;
    let mut rng = estimator
        .seed()
        .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);

    trace_info!(
        res1 = %first.label(),
        res2 = %second.label(),
        parameters = parameters.len(),
        "comparing results"
    );

    let mut jsd = BTreeMap::new();
    for &name in parameters {
        let (Some(a), Some(b)) = (post1.get(name), post2.get(name)) else {
            continue;
        };
        let Some(domain) = priors.parameter_domain(name)? else {
            trace_warn!(parameter = name, "parameter has no prior, skipping");
            continue;
        };

        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("parameter", name, boundary = %domain.boundary()).entered();

        trace_info!("calculating JSD");
        let result = estimator.estimate_with_rng(a, b, &domain, &mut rng)?;
        jsd.insert(name.to_string(), result);
    }

    trace_info!(computed = jsd.len(), "comparison finished");
    Ok(JsdReport {
        res1: first.label(),
        res2: second.label(),
        base: estimator.base(),
        seed: estimator.seed(),
        n_samples: estimator.n_samples(),
        n_tests: Some(estimator.n_tests()),
        jsd,
    })
}

/// Compares two JSON result files and writes the report to `output`.
///
/// # Errors
///
/// Same as [`compare`], plus errors writing the report.
pub fn compare_files(
    first: impl AsRef<Path>,
    second: impl AsRef<Path>,
    output: impl AsRef<Path>,
    parameters: &[&str],
    estimator: &JsdEstimator,
) -> Result<JsdReport> {
    let first = JsonResultFile::new(first.as_ref());
    let second = JsonResultFile::new(second.as_ref());
    let report = compare(&first, &second, parameters, estimator)?;
    report.save(output)?;
    Ok(report)
}
