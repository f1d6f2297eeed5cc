#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a boundary type name is not recognized.
    #[error("unknown boundary type: '{0}'")]
    UnknownBoundaryType(String),

    /// Returned when a boundary type needs bounds that are absent.
    #[error("boundary type '{boundary}' requires {requirement}")]
    MissingBounds {
        /// The boundary type that was requested.
        boundary: &'static str,
        /// Which bounds the boundary type needs.
        requirement: &'static str,
    },

    /// Returned when the lower bound is greater than the upper bound.
    #[error("invalid bounds: lower ({lower}) must not exceed upper ({upper})")]
    InvalidBounds {
        /// The lower bound value.
        lower: f64,
        /// The upper bound value.
        upper: f64,
    },

    /// Returned when circular bandwidth estimation is disabled and no
    /// concentration was supplied.
    #[error("circular KDE needs a concentration when bandwidth estimation is disabled")]
    MissingConcentration,

    /// Returned when a concentration parameter or its search range is not positive.
    #[error("invalid concentration: {0} must be positive and finite")]
    InvalidConcentration(f64),

    /// Returned when bandwidth is not positive.
    #[error("invalid bandwidth: {0} must be positive")]
    InvalidBandwidth(f64),

    /// Returned when a sample set is empty.
    #[error("sample set must contain at least one sample")]
    EmptySamples,

    /// Returned when the per-replicate subsample size is zero.
    #[error("invalid sample count: {0} must be at least 1")]
    InvalidSampleCount(usize),

    /// Returned when the number of replicates is zero.
    #[error("invalid test count: {0} must be at least 1")]
    InvalidTestCount(usize),

    /// Returned when the evaluation grid has fewer than two points.
    #[error("invalid grid size: {0} must be at least 2")]
    InvalidGridSize(usize),

    /// Returned when the logarithm base is not positive or equals one.
    #[error("invalid logarithm base: {0} must be positive and not equal to 1")]
    InvalidBase(f64),

    /// Returned when the prior metadata of two compared inputs differ.
    #[error("priors are not the same")]
    PriorMismatch,

    /// Returned when the worker pool cannot be created.
    #[error("thread pool error: {0}")]
    ThreadPool(String),

    /// Returned when reading or writing a file fails.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when a JSON document cannot be parsed or written.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
