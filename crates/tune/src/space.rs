//! Hyperparameter search spaces.
//!
//! A [`HyperparameterSpace`] is an insertion-ordered list of named
//! [`Domain`]s. The Bayesian search works in normalised `[0, 1]`
//! coordinates; [`HyperparameterSpace::to_unit()`] and
//! [`HyperparameterSpace::from_unit()`] convert between those and concrete
//! [`ParamSet`]s.

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Error raised when building or querying a [`HyperparameterSpace`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpaceError {
    /// Returned when a categorical domain has no values.
    #[error("domain {name:?} is empty")]
    EmptyDomain {
        /// Parameter name.
        name: String,
    },

    /// Returned when `low > high`.
    #[error("domain {name:?} has low bound {low} above high bound {high}")]
    InvertedBounds {
        /// Parameter name.
        name: String,
        /// Lower bound.
        low: f64,
        /// Upper bound.
        high: f64,
    },

    /// Returned when a real bound is NaN or infinite.
    #[error("domain {name:?} has a non-finite bound")]
    NonFiniteBound {
        /// Parameter name.
        name: String,
    },

    /// Returned when a name is inserted twice.
    #[error("parameter {name:?} is already defined")]
    DuplicateName {
        /// Parameter name.
        name: String,
    },

    /// Returned when a parameter set lacks a value for a dimension, or holds
    /// one outside the domain.
    #[error("parameter {name:?} is missing or outside its domain")]
    OutOfDomain {
        /// Parameter name.
        name: String,
    },
}

/// A concrete hyperparameter value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Integer value.
    Int(i64),
    /// Real value.
    Real(f64),
}

impl ParamValue {
    /// Integer content, if this is an [`ParamValue::Int`].
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Real(_) => None,
        }
    }

    /// Numeric content as `f64` (integers are widened).
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(v) => *v as f64,
            Self::Real(v) => *v,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
        }
    }
}

/// One point of a search space: name → value.
pub type ParamSet = BTreeMap<String, ParamValue>;

/// The set of values one hyperparameter may take.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Integers in the closed range `[low, high]`.
    Integer {
        /// Smallest value.
        low: i64,
        /// Largest value.
        high: i64,
    },
    /// Reals in the closed range `[low, high]`.
    Real {
        /// Smallest value.
        low: f64,
        /// Largest value.
        high: f64,
    },
    /// An explicit list of values.
    Categorical(Vec<ParamValue>),
}

impl Domain {
    /// Categorical domain of integers.
    pub fn ints<I: IntoIterator<Item = i64>>(values: I) -> Self {
        Self::Categorical(values.into_iter().map(ParamValue::Int).collect())
    }

    fn check(&self, name: &str) -> Result<(), SpaceError> {
        match self {
            Self::Integer { low, high } if low > high => Err(SpaceError::InvertedBounds {
                name: name.to_string(),
                low: *low as f64,
                high: *high as f64,
            }),
            Self::Real { low, high } if !low.is_finite() || !high.is_finite() => {
                Err(SpaceError::NonFiniteBound {
                    name: name.to_string(),
                })
            }
            Self::Real { low, high } if low > high => Err(SpaceError::InvertedBounds {
                name: name.to_string(),
                low: *low,
                high: *high,
            }),
            Self::Categorical(values) if values.is_empty() => Err(SpaceError::EmptyDomain {
                name: name.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Whether `value` lies in this domain.
    pub fn contains(&self, value: &ParamValue) -> bool {
        match (self, value) {
            (Self::Integer { low, high }, ParamValue::Int(v)) => (*low..=*high).contains(v),
            (Self::Real { low, high }, v) => (*low..=*high).contains(&v.as_f64()),
            (Self::Categorical(values), v) => values.contains(v),
            _ => false,
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ParamValue {
        match self {
            Self::Integer { low, high } => ParamValue::Int(rng.random_range(*low..=*high)),
            Self::Real { low, high } => ParamValue::Real(rng.random_range(*low..=*high)),
            Self::Categorical(values) => values[rng.random_range(0..values.len())],
        }
    }

    fn to_unit(&self, value: &ParamValue) -> Option<f64> {
        let unit = |x: f64, low: f64, high: f64| {
            if high > low { (x - low) / (high - low) } else { 0.5 }
        };
        match self {
            Self::Integer { low, high } => {
                Some(unit(value.as_i64()? as f64, *low as f64, *high as f64))
            }
            Self::Real { low, high } => Some(unit(value.as_f64(), *low, *high)),
            Self::Categorical(values) => {
                let index = values.iter().position(|v| v == value)?;
                Some(unit(index as f64, 0.0, values.len() as f64 - 1.0))
            }
        }
    }

    fn from_unit(&self, u: f64) -> ParamValue {
        let u = u.clamp(0.0, 1.0);
        match self {
            Self::Integer { low, high } => {
                let span = (*high - *low) as f64;
                ParamValue::Int((*low + (u * span).round() as i64).min(*high))
            }
            Self::Real { low, high } => ParamValue::Real(low + u * (high - low)),
            Self::Categorical(values) => {
                let index = (u * (values.len() - 1) as f64).round() as usize;
                values[index.min(values.len() - 1)]
            }
        }
    }
}

/// An insertion-ordered mapping from parameter name to [`Domain`].
///
/// Every domain is validated on insertion, so a constructed space is never
/// empty along any dimension.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HyperparameterSpace {
    dims: Vec<(String, Domain)>,
}

impl HyperparameterSpace {
    /// Creates an empty space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dimension.
    ///
    /// # Errors
    ///
    /// [`SpaceError::DuplicateName`] or whatever the domain check rejects.
    pub fn insert(&mut self, name: impl Into<String>, domain: Domain) -> Result<(), SpaceError> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(SpaceError::DuplicateName { name });
        }
        domain.check(&name)?;
        self.dims.push((name, domain));
        Ok(())
    }

    /// Builds a space from dimensions known to be valid.
    pub(crate) fn from_trusted(dims: Vec<(String, Domain)>) -> Self {
        debug_assert!(dims.iter().all(|(name, domain)| domain.check(name).is_ok()));
        Self { dims }
    }

    /// Chaining form of [`HyperparameterSpace::insert()`].
    ///
    /// # Errors
    ///
    /// Same as [`HyperparameterSpace::insert()`].
    pub fn with(mut self, name: impl Into<String>, domain: Domain) -> Result<Self, SpaceError> {
        self.insert(name, domain)?;
        Ok(self)
    }

    /// ARIMA grid over the given `p`, `q` and `d` candidates.
    ///
    /// ```
    /// use foretune_tune::HyperparameterSpace;
    ///
    /// let space = HyperparameterSpace::arima(&[1, 2], &[0, 1], &[0]).unwrap();
    /// assert_eq!(space.names().collect::<Vec<_>>(), ["p", "q", "d"]);
    /// ```
    ///
    /// # Errors
    ///
    /// [`SpaceError::EmptyDomain`] when any list is empty.
    pub fn arima(p: &[usize], q: &[usize], d: &[usize]) -> Result<Self, SpaceError> {
        let ints = |xs: &[usize]| Domain::ints(xs.iter().map(|&x| x as i64));
        Self::new()
            .with("p", ints(p))?
            .with("q", ints(q))?
            .with("d", ints(d))
    }

    /// Domain of `name`.
    pub fn get(&self, name: &str) -> Option<&Domain> {
        self.dims.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    /// Iterates `(name, domain)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Domain)> {
        self.dims.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// Iterates names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.dims.iter().map(|(n, _)| n.as_str())
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.dims.len()
    }

    /// `true` when the space has no dimensions.
    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    /// Draws one point uniformly from every domain.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ParamSet {
        self.dims
            .iter()
            .map(|(name, domain)| (name.clone(), domain.sample(rng)))
            .collect()
    }

    /// Whether `params` holds an in-domain value for every dimension.
    pub fn contains(&self, params: &ParamSet) -> bool {
        self.dims
            .iter()
            .all(|(name, domain)| params.get(name).is_some_and(|v| domain.contains(v)))
    }

    /// Normalised coordinates of `params`, one per dimension.
    ///
    /// # Errors
    ///
    /// [`SpaceError::OutOfDomain`] when a dimension is missing or its value
    /// does not fit the domain.
    pub fn to_unit(&self, params: &ParamSet) -> Result<Vec<f64>, SpaceError> {
        self.dims
            .iter()
            .map(|(name, domain)| {
                params
                    .get(name)
                    .and_then(|v| domain.to_unit(v))
                    .ok_or_else(|| SpaceError::OutOfDomain { name: name.clone() })
            })
            .collect()
    }

    /// Concrete point nearest to the normalised coordinates `unit`.
    /// Coordinates are clamped to `[0, 1]`; missing trailing coordinates
    /// read as 0.
    pub fn from_unit(&self, unit: &[f64]) -> ParamSet {
        self.dims
            .iter()
            .enumerate()
            .map(|(i, (name, domain))| {
                let u = unit.get(i).copied().unwrap_or(0.0);
                (name.clone(), domain.from_unit(u))
            })
            .collect()
    }
}
