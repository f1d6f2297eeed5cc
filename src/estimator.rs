//! Batch Jensen-Shannon divergence estimation by repeated subsampling.
//!
//! Each replicate draws a fresh subsample (without replacement) from both
//! sample sets, fits a density to each on the shared domain, and computes
//! their divergence on the overlap grid. All random draws happen on the
//! calling thread before replicates are dispatched, so a seeded estimate is
//! reproducible regardless of the worker count.
//!
//! # Examples
//!
//! ```
//! use posterior_jsd::{Domain, JsdEstimator, OutputMode};
//!
//! let estimator = JsdEstimator::builder()
//!     .n_tests(4)
//!     .n_samples(200)
//!     .grid_points(200)
//!     .seed(42)
//!     .output(OutputMode::Raw)
//!     .build()
//!     .unwrap();
//!
//! let a: Vec<f64> = (0..500).map(|i| f64::from(i) / 500.0).collect();
//! let b: Vec<f64> = (0..500).map(|i| f64::from(i) / 500.0 + 0.001).collect();
//! let result = estimator.estimate(&a, &b, &Domain::unbounded()).unwrap();
//! assert!(result.central() < 0.01);
//! ```

use rayon::prelude::*;

use crate::divergence::replicate_divergence;
use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::kde::{Bandwidth, KdeConfig, PeriodicMethod};
use crate::result::{DivergenceResult, MedianError};
use crate::rng_util;

/// How replicate values are reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Run one replicate and report its value.
    Single,
    /// Report the median with the 16th/84th percentile spread.
    #[default]
    Summary,
    /// Report every replicate value, in replicate order.
    Raw,
}

/// Repeated-subsampling JSD estimator.
///
/// Construct with [`JsdEstimator::builder`].
#[derive(Debug)]
pub struct JsdEstimator {
    n_tests: usize,
    n_samples: Option<usize>,
    grid_points: usize,
    base: f64,
    seed: Option<u64>,
    output: OutputMode,
    kde: KdeConfig,
    /// `None` runs replicates sequentially on the calling thread.
    pool: Option<rayon::ThreadPool>,
}

impl JsdEstimator {
    /// Returns a builder with the default configuration.
    #[must_use]
    pub fn builder() -> JsdEstimatorBuilder {
        JsdEstimatorBuilder::new()
    }

    /// Number of replicates per estimate.
    #[must_use]
    pub fn n_tests(&self) -> usize {
        match self.output {
            OutputMode::Single => 1,
            _ => self.n_tests,
        }
    }

    /// Requested subsample size, if any.
    #[must_use]
    pub fn n_samples(&self) -> Option<usize> {
        self.n_samples
    }

    /// Logarithm base.
    #[must_use]
    pub fn base(&self) -> f64 {
        self.base
    }

    /// Configured seed.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Estimates the divergence between `a` and `b`, seeding a fresh
    /// generator from the configured seed.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptySamples` if either sample set is empty and
    /// propagates fitting errors.
    pub fn estimate(&self, a: &[f64], b: &[f64], domain: &Domain) -> Result<DivergenceResult> {
        let mut rng = self.seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
        self.estimate_with_rng(a, b, domain, &mut rng)
    }

    /// Like [`JsdEstimator::estimate`], drawing subsamples from `rng`.
    ///
    /// The generator is advanced by exactly the draws of this estimate, so a
    /// caller can chain several estimates on one generator.
    ///
    /// # Errors
    ///
    /// Same as [`JsdEstimator::estimate`].
    pub fn estimate_with_rng(
        &self,
        a: &[f64],
        b: &[f64],
        domain: &Domain,
        rng: &mut fastrand::Rng,
    ) -> Result<DivergenceResult> {
        if a.is_empty() || b.is_empty() {
            return Err(Error::EmptySamples);
        }

        let n_samples = self.resolve_sample_count(a.len(), b.len());
        let n_tests = self.n_tests();

        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("jsd_estimate", n_tests, n_samples).entered();

        trace_info!(boundary = %domain.boundary(), "starting JSD estimate");

        // Every subsample of `a` is drawn before any of `b`
        let draws_a: Vec<Vec<f64>> = (0..n_tests)
            .map(|_| rng_util::subsample(a, n_samples, rng))
            .collect();
        let draws: Vec<(Vec<f64>, Vec<f64>)> = draws_a
            .into_iter()
            .map(|sa| (sa, rng_util::subsample(b, n_samples, rng)))
            .collect();

        let replicate = |(sa, sb): &(Vec<f64>, Vec<f64>)| {
            replicate_divergence(sa, sb, domain, &self.kde, self.grid_points, self.base)
        };
        let values = match &self.pool {
            Some(pool) => pool.install(|| draws.par_iter().map(replicate).collect::<Result<Vec<_>>>())?,
            None => draws.iter().map(replicate).collect::<Result<Vec<_>>>()?,
        };

        let result = self.aggregate(values);
        trace_info!(jsd = result.central(), "finished JSD estimate");
        Ok(result)
    }

    /// Subsample size: the requested count, or the smaller input size when
    /// unset or when the request exceeds it.
    fn resolve_sample_count(&self, len_a: usize, len_b: usize) -> usize {
        let available = len_a.min(len_b);
        match self.n_samples {
            None => available,
            Some(requested) if requested > available => {
                trace_warn!(
                    requested,
                    available,
                    "requested sample count exceeds available samples, using all"
                );
                available
            }
            Some(requested) => requested,
        }
    }

    fn aggregate(&self, values: Vec<f64>) -> DivergenceResult {
        match self.output {
            OutputMode::Single => DivergenceResult::Scalar(values.first().copied().unwrap_or(0.0)),
            OutputMode::Raw => DivergenceResult::Raw(values),
            OutputMode::Summary => MedianError::from_values(&values).map_or(
                DivergenceResult::Raw(Vec::new()),
                DivergenceResult::Summary,
            ),
        }
    }
}

impl Default for JsdEstimator {
    fn default() -> Self {
        Self {
            n_tests: 10,
            n_samples: Some(1000),
            grid_points: 1000,
            base: 2.0,
            seed: None,
            output: OutputMode::Summary,
            kde: KdeConfig::default(),
            pool: None,
        }
    }
}

/// Builder for [`JsdEstimator`].
#[derive(Clone, Debug)]
pub struct JsdEstimatorBuilder {
    n_tests: usize,
    n_samples: Option<usize>,
    grid_points: usize,
    base: f64,
    seed: Option<u64>,
    n_workers: Option<usize>,
    output: OutputMode,
    kde: KdeConfig,
}

impl JsdEstimatorBuilder {
    /// Creates a new builder with default settings.
    ///
    /// Default settings:
    /// - `n_tests`: 10 replicates
    /// - `n_samples`: 1000 per replicate
    /// - `grid_points`: 1000
    /// - `base`: 2 (divergence in bits)
    /// - seed: None (use OS-provided entropy)
    /// - `n_workers`: None (sequential)
    /// - output: [`OutputMode::Summary`]
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_tests: 10,
            n_samples: Some(1000),
            grid_points: 1000,
            base: 2.0,
            seed: None,
            n_workers: None,
            output: OutputMode::Summary,
            kde: KdeConfig::default(),
        }
    }

    /// Sets the number of replicates.
    #[must_use]
    pub fn n_tests(mut self, n: usize) -> Self {
        self.n_tests = n;
        self
    }

    /// Sets the subsample size drawn from each set per replicate.
    #[must_use]
    pub fn n_samples(mut self, n: usize) -> Self {
        self.n_samples = Some(n);
        self
    }

    /// Uses the smaller of the two input sizes as the subsample size.
    #[must_use]
    pub fn all_samples(mut self) -> Self {
        self.n_samples = None;
        self
    }

    /// Sets the number of evaluation grid points.
    #[must_use]
    pub fn grid_points(mut self, n: usize) -> Self {
        self.grid_points = n;
        self
    }

    /// Sets the logarithm base of the divergence.
    #[must_use]
    pub fn base(mut self, base: f64) -> Self {
        self.base = base;
        self
    }

    /// Sets a seed for reproducible subsampling.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the number of worker threads. `1` runs sequentially.
    #[must_use]
    pub fn n_workers(mut self, n: usize) -> Self {
        self.n_workers = Some(n);
        self
    }

    /// Sets how replicate values are reported.
    #[must_use]
    pub fn output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// Sets the density estimator configuration.
    #[must_use]
    pub fn kde(mut self, kde: KdeConfig) -> Self {
        self.kde = kde;
        self
    }

    /// Builds the configured [`JsdEstimator`].
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTestCount` for zero replicates,
    /// `Error::InvalidSampleCount` for a zero subsample size,
    /// `Error::InvalidGridSize` for fewer than two grid points,
    /// `Error::InvalidBase` for a base that is not positive or equals one,
    /// `Error::InvalidBandwidth` for an invalid fixed bandwidth,
    /// the circular configuration errors when von Mises kernels are
    /// selected, and `Error::ThreadPool` if the worker pool cannot be
    /// created.
    pub fn build(self) -> Result<JsdEstimator> {
        if self.n_tests == 0 {
            return Err(Error::InvalidTestCount(0));
        }
        if self.n_samples == Some(0) {
            return Err(Error::InvalidSampleCount(0));
        }
        if self.grid_points < 2 {
            return Err(Error::InvalidGridSize(self.grid_points));
        }
        let unit_base = (self.base - 1.0).abs() < f64::EPSILON;
        if !(self.base > 0.0 && self.base.is_finite()) || unit_base {
            return Err(Error::InvalidBase(self.base));
        }
        if let Bandwidth::Fixed(_) = self.kde.bandwidth {
            self.kde.bandwidth.select(&[])?;
        }
        if self.kde.periodic == PeriodicMethod::VonMises {
            self.kde.circular.validate()?;
        }

        let pool = match self.n_workers {
            Some(n) if n > 1 => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| Error::ThreadPool(e.to_string()))?,
            ),
            _ => None,
        };

        Ok(JsdEstimator {
            n_tests: self.n_tests,
            n_samples: self.n_samples,
            grid_points: self.grid_points,
            base: self.base,
            seed: self.seed,
            output: self.output,
            kde: self.kde,
            pool,
        })
    }
}

impl Default for JsdEstimatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
