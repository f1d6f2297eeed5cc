//! Posterior sample sets and the sources they are loaded from.
//!
//! A [`ResultSource`] supplies the two things a comparison needs from one
//! inference result: its prior metadata and its posterior samples.
//! [`JsonResultFile`] reads both from a JSON document on disk;
//! [`MemoryResult`] holds them in memory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::persistence;
use crate::prior::PriorSet;

/// Posterior samples keyed by parameter name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Posterior(BTreeMap<String, Vec<f64>>);

impl Posterior {
    /// An empty posterior.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the samples of `name`.
    pub fn insert(&mut self, name: impl Into<String>, samples: Vec<f64>) {
        self.0.insert(name.into(), samples);
    }

    /// The samples of `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// True when `name` has samples.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no parameter has samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parameter names in order.
    #[must_use]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Keeps only the requested parameters. Requested names without samples
    /// are reported and skipped.
    #[must_use]
    pub fn select(&self, parameters: &[&str]) -> Self {
        let mut out = Self::new();
        for &name in parameters {
            match self.0.get(name) {
                Some(samples) => out.insert(name, samples.clone()),
                None => {
                    trace_warn!(parameter = name, "parameter not found in posterior, skipping");
                }
            }
        }
        out
    }
}

impl FromIterator<(String, Vec<f64>)> for Posterior {
    fn from_iter<I: IntoIterator<Item = (String, Vec<f64>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One inference result: prior metadata plus posterior samples.
pub trait ResultSource {
    /// Identifier recorded in reports.
    fn label(&self) -> String;

    /// Loads the prior metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be read.
    fn priors(&self) -> Result<PriorSet>;

    /// Loads the samples of the requested parameters.
    ///
    /// Requested parameters that are absent are skipped, not errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the samples cannot be read.
    fn posterior(&self, parameters: &[&str]) -> Result<Posterior>;
}

/// On-disk layout of a result file.
///
/// ```json
/// {
///   "posterior": { "chirp_mass": [1.2, 1.21] },
///   "priors": { "chirp_mass": { "minimum": 1.0, "maximum": 1.5, "boundary": null } }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultDocument {
    /// Posterior samples.
    pub posterior: Posterior,
    /// Prior metadata.
    #[serde(default)]
    pub priors: PriorSet,
}

impl ResultDocument {
    /// Writes the document to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        persistence::save_json(path.as_ref(), self)
    }
}

/// A result stored as a JSON [`ResultDocument`].
///
/// The file is read on every call, so prior metadata can be checked before
/// any samples are used.
#[derive(Clone, Debug)]
pub struct JsonResultFile {
    path: PathBuf,
}

impl JsonResultFile {
    /// Refers to the result file at `path`. Nothing is read yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Deserialize)]
struct PriorsOnly {
    #[serde(default)]
    priors: PriorSet,
}

#[derive(Deserialize)]
struct PosteriorOnly {
    posterior: Posterior,
}

impl ResultSource for JsonResultFile {
    fn label(&self) -> String {
        self.path.display().to_string()
    }

    fn priors(&self) -> Result<PriorSet> {
        let doc: PriorsOnly = persistence::load_json(&self.path)?;
        Ok(doc.priors)
    }

    fn posterior(&self, parameters: &[&str]) -> Result<Posterior> {
        let doc: PosteriorOnly = persistence::load_json(&self.path)?;
        Ok(doc.posterior.select(parameters))
    }
}

/// A result held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryResult {
    label: String,
    document: ResultDocument,
}

impl MemoryResult {
    /// Wraps in-memory samples and priors under `label`.
    #[must_use]
    pub fn new(label: impl Into<String>, posterior: Posterior, priors: PriorSet) -> Self {
        Self {
            label: label.into(),
            document: ResultDocument { posterior, priors },
        }
    }

    /// The wrapped document.
    #[must_use]
    pub fn document(&self) -> &ResultDocument {
        &self.document
    }
}

impl ResultSource for MemoryResult {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn priors(&self) -> Result<PriorSet> {
        Ok(self.document.priors.clone())
    }

    fn posterior(&self, parameters: &[&str]) -> Result<Posterior> {
        Ok(self.document.posterior.select(parameters))
    }
}
