//! Prior metadata: per-parameter bounds and boundary policy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{BoundaryType, Domain};
use crate::error::Result;

/// Parameters that are bounded but whose prior density vanishes at the
/// bounds. They are fitted without boundary handling.
pub const ZERO_DENSITY_AT_BOUNDARY: &[&str] = &["theta_jn", "tilt_1", "tilt_2", "dec"];

/// Prior bounds and boundary policy of one parameter.
///
/// Missing (`null`) bounds mean the parameter is unbounded on that side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorRecord {
    /// Lower bound of the prior support.
    #[serde(default)]
    pub minimum: Option<f64>,
    /// Upper bound of the prior support.
    #[serde(default)]
    pub maximum: Option<f64>,
    /// Boundary policy; inferred from the bounds when absent.
    #[serde(default)]
    pub boundary: Option<BoundaryType>,
}

impl PriorRecord {
    /// A record with both bounds and an explicit policy.
    #[must_use]
    pub fn new(minimum: f64, maximum: f64, boundary: Option<BoundaryType>) -> Self {
        Self {
            minimum: Some(minimum),
            maximum: Some(maximum),
            boundary,
        }
    }

    /// The fitting domain this prior describes.
    ///
    /// # Errors
    ///
    /// Same as [`Domain::new`].
    pub fn domain(&self) -> Result<Domain> {
        Domain::new(self.minimum, self.maximum, self.boundary)
    }
}

/// Prior metadata of every parameter in a result, keyed by name.
///
/// # Examples
///
/// ```
/// use posterior_jsd::prior::{PriorRecord, PriorSet};
/// use posterior_jsd::BoundaryType;
///
/// let mut priors = PriorSet::new();
/// priors.insert("a_1", PriorRecord::new(0.0, 0.99, None));
/// priors.insert("theta_jn", PriorRecord::new(0.0, std::f64::consts::PI, Some(BoundaryType::Reflective)));
///
/// let spin = priors.parameter_domain("a_1").unwrap().unwrap();
/// assert_eq!(spin.boundary(), BoundaryType::Reflective);
///
/// // Inclination has zero prior density at its bounds
/// let inclination = priors.parameter_domain("theta_jn").unwrap().unwrap();
/// assert_eq!(inclination.boundary(), BoundaryType::None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorSet(BTreeMap<String, PriorRecord>);

impl PriorSet {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the record of `name`.
    pub fn insert(&mut self, name: impl Into<String>, record: PriorRecord) {
        self.0.insert(name.into(), record);
    }

    /// The record of `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PriorRecord> {
        self.0.get(name)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no parameter has a prior.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, record)` pairs in name order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PriorRecord)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The fitting domain of `name`, or `None` if it has no prior.
    ///
    /// Parameters in [`ZERO_DENSITY_AT_BOUNDARY`] keep their bounds but use
    /// `BoundaryType::None`.
    ///
    /// # Errors
    ///
    /// Same as [`Domain::new`].
    pub fn parameter_domain(&self, name: &str) -> Result<Option<Domain>> {
        let Some(record) = self.get(name) else {
            return Ok(None);
        };
        if ZERO_DENSITY_AT_BOUNDARY.contains(&name) {
            return Domain::new(record.minimum, record.maximum, Some(BoundaryType::None)).map(Some);
        }
        record.domain().map(Some)
    }
}

impl FromIterator<(String, PriorRecord)> for PriorSet {
    fn from_iter<I: IntoIterator<Item = (String, PriorRecord)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
