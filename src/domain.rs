//! Domain specifications: bounds plus the boundary-handling policy.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// How a parameter's domain constrains density estimation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryType {
    /// No constraint; the base kernel is used as-is.
    None,
    /// Linear rescale of `[lower, upper]` onto `[0, 1]`.
    UnitInterval,
    /// Unit-interval rescale followed by the inverse Gaussian CDF (probit).
    Bounded,
    /// Samples mirrored across every present bound.
    Reflective,
    /// Samples replicated one period to either side.
    Periodic,
}

impl BoundaryType {
    /// Canonical name, as written in prior metadata and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::UnitInterval => "unit",
            Self::Bounded => "bounded",
            Self::Reflective => "reflective",
            Self::Periodic => "periodic",
        }
    }
}

impl fmt::Display for BoundaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundaryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "unit" | "unit-interval" | "unit_interval" => Ok(Self::UnitInterval),
            "bounded" => Ok(Self::Bounded),
            "reflective" => Ok(Self::Reflective),
            "periodic" => Ok(Self::Periodic),
            _ => Err(Error::UnknownBoundaryType(s.to_string())),
        }
    }
}

impl Serialize for BoundaryType {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BoundaryType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Bounds of a parameter plus the boundary policy used when fitting it.
///
/// Construct with [`Domain::new`], which validates that the boundary type has
/// the bounds it needs. Non-finite bounds are treated as absent.
///
/// # Examples
///
/// ```
/// use posterior_jsd::{BoundaryType, Domain};
///
/// let domain = Domain::new(Some(0.0), Some(1.0), Some(BoundaryType::Bounded)).unwrap();
/// assert_eq!(domain.boundary(), BoundaryType::Bounded);
///
/// // Two finite bounds and no explicit policy default to reflection.
/// let inferred = Domain::new(Some(0.0), Some(1.0), None).unwrap();
/// assert_eq!(inferred.boundary(), BoundaryType::Reflective);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain {
    lower: Option<f64>,
    upper: Option<f64>,
    boundary: BoundaryType,
}

impl Domain {
    /// An unbounded domain using the base kernel directly.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            lower: None,
            upper: None,
            boundary: BoundaryType::None,
        }
    }

    /// Creates a validated domain.
    ///
    /// When `boundary` is `None` the policy is inferred: reflective if both
    /// bounds are present, no boundary handling otherwise.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingBounds` if the boundary type needs bounds that
    /// are absent, and `Error::InvalidBounds` if `lower > upper`.
    pub fn new(lower: Option<f64>, upper: Option<f64>, boundary: Option<BoundaryType>) -> Result<Self> {
        let lower = lower.filter(|b| b.is_finite());
        let upper = upper.filter(|b| b.is_finite());

        let boundary = boundary.unwrap_or(if lower.is_some() && upper.is_some() {
            BoundaryType::Reflective
        } else {
            BoundaryType::None
        });

        match boundary {
            BoundaryType::None => {}
            BoundaryType::UnitInterval | BoundaryType::Bounded | BoundaryType::Periodic => {
                if lower.is_none() || upper.is_none() {
                    return Err(Error::MissingBounds {
                        boundary: boundary.as_str(),
                        requirement: "both a lower and an upper bound",
                    });
                }
            }
            BoundaryType::Reflective => {
                if lower.is_none() && upper.is_none() {
                    return Err(Error::MissingBounds {
                        boundary: boundary.as_str(),
                        requirement: "at least one bound",
                    });
                }
            }
        }

        if let (Some(lower), Some(upper)) = (lower, upper) {
            if lower > upper {
                return Err(Error::InvalidBounds { lower, upper });
            }
        }

        Ok(Self {
            lower,
            upper,
            boundary,
        })
    }

    /// Like [`Domain::new`], taking the boundary type by name.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownBoundaryType` for an unrecognized name, plus
    /// everything [`Domain::new`] can return.
    pub fn with_boundary_name(lower: Option<f64>, upper: Option<f64>, boundary: &str) -> Result<Self> {
        Self::new(lower, upper, Some(boundary.parse()?))
    }

    /// Moves both present bounds outward by `eps`.
    #[must_use]
    pub fn widened(mut self, eps: f64) -> Self {
        self.lower = self.lower.map(|b| b - eps);
        self.upper = self.upper.map(|b| b + eps);
        self
    }

    /// Returns the same bounds with a different boundary policy.
    ///
    /// # Errors
    ///
    /// Same as [`Domain::new`].
    pub fn with_boundary(self, boundary: BoundaryType) -> Result<Self> {
        Self::new(self.lower, self.upper, Some(boundary))
    }

    /// The lower bound, if any.
    #[must_use]
    pub fn lower(&self) -> Option<f64> {
        self.lower
    }

    /// The upper bound, if any.
    #[must_use]
    pub fn upper(&self) -> Option<f64> {
        self.upper
    }

    /// The boundary policy.
    #[must_use]
    pub fn boundary(&self) -> BoundaryType {
        self.boundary
    }

    /// `upper - lower` when both bounds are present.
    #[must_use]
    pub fn width(&self) -> Option<f64> {
        Some(self.upper? - self.lower?)
    }

    /// True when both bounds are used and they coincide.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.boundary != BoundaryType::None && self.width().is_some_and(|w| w <= 0.0)
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::unbounded()
    }
}
