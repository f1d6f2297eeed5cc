#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Jensen-Shannon divergence between posterior sample sets, estimated with
//! kernel density estimators that respect bounded, reflective, and periodic
//! parameter domains.
//!
//! # Getting Started
//!
//! Compare two sample sets of a parameter bounded on `[0, 1]`:
//!
//! ```
//! use posterior_jsd::prelude::*;
//!
//! let mut rng = fastrand::Rng::with_seed(7);
//! let a: Vec<f64> = (0..2000).map(|_| rng.f64()).collect();
//! let b: Vec<f64> = (0..2000).map(|_| rng.f64()).collect();
//!
//! let domain = Domain::new(Some(0.0), Some(1.0), Some(BoundaryType::Reflective)).unwrap();
//! let estimator = JsdEstimator::builder().n_tests(5).n_samples(500).seed(42).build().unwrap();
//!
//! let result = estimator.estimate(&a, &b, &domain).unwrap();
//! println!("JSD = {:.4} bits", result.central());
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Domain`] | Bounds of a parameter plus its [`BoundaryType`]. |
//! | [`BoundaryTransform`](transform::BoundaryTransform) | Maps samples into a space where an unbounded kernel applies, and corrects densities back. |
//! | [`FittedDensity`](kde::FittedDensity) | A fitted estimator: [`BoundedKde`](kde::BoundedKde) or [`CircularKde`](kde::CircularKde). |
//! | [`JsdEstimator`] | Repeated subsampling, fitting, and divergence, optionally on a worker pool. |
//! | [`DivergenceResult`] | A single value, a median with 68% spread, or every replicate. |
//! | [`compare`] | Runs the estimator over every shared parameter of two results. |
//!
//! # Boundary Types
//!
//! | Name | Handling |
//! |------|----------|
//! | `none` | Gaussian kernel as-is |
//! | `unit` | Linear rescale onto `[0, 1]` |
//! | `bounded` | Rescale then inverse Gaussian CDF (probit) |
//! | `reflective` | Samples mirrored across each present bound |
//! | `periodic` | Samples copied one period to either side, or von Mises kernels |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) for estimates and comparisons | on |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::warn!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_warn {
    ($($arg:tt)*) => { tracing::warn!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn {
    ($($arg:tt)*) => {};
}

pub mod divergence;
mod domain;
mod error;
mod estimator;
pub mod kde;
mod persistence;
pub mod posterior;
pub mod prior;
pub mod report;
mod result;
mod rng_util;
pub mod special;
mod stats;
pub mod transform;

pub use domain::{BoundaryType, Domain};
pub use error::{Error, Result};
pub use estimator::{JsdEstimator, JsdEstimatorBuilder, OutputMode};
pub use report::{JsdReport, compare, compare_files};
pub use result::{DivergenceResult, MedianError};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use posterior_jsd::prelude::*;
/// ```
pub mod prelude {
    pub use crate::divergence::{divergence, jensen_shannon_distance, overlap_grid};
    pub use crate::domain::{BoundaryType, Domain};
    pub use crate::error::{Error, Result};
    pub use crate::estimator::{JsdEstimator, JsdEstimatorBuilder, OutputMode};
    pub use crate::kde::{
        Bandwidth, BandwidthRule, BoundedKde, CircularConfig, CircularKde, FittedDensity,
        KdeConfig, PeriodicMethod, fit_density,
    };
    pub use crate::posterior::{JsonResultFile, MemoryResult, Posterior, ResultSource};
    pub use crate::prior::{PriorRecord, PriorSet};
    pub use crate::report::{JsdReport, compare, compare_files};
    pub use crate::result::{DivergenceResult, MedianError};
}
