//! Information criteria used to rank ARIMA orders.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TuneError;

/// Scoring method for the ARIMA grid search. Lower is better for all three.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    /// Akaike Information Criterion.
    Aic,
    /// Bayesian Information Criterion.
    Bic,
    /// Standard error of the second estimated parameter.
    Bse,
}

impl Criterion {
    /// Lower-case method name, as accepted by [`str::parse`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aic => "aic",
            Self::Bic => "bic",
            Self::Bse => "bse",
        }
    }
}

impl FromStr for Criterion {
    type Err = TuneError;

    /// Parses exactly `aic`, `bic` or `bse`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aic" => Ok(Self::Aic),
            "bic" => Ok(Self::Bic),
            "bse" => Ok(Self::Bse),
            _ => Err(TuneError::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}
