//! Error types for the foretune-tune crate.

use foretune_arima::{ArimaError, ArimaOrder};
use foretune_gbm::GbmError;
use foretune_stats::StatsError;

use crate::space::SpaceError;

/// Error type for all fallible operations in the foretune-tune crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TuneError {
    /// Returned when the scoring method name is not recognised.
    #[error("unknown scoring method {0:?}: expected one of aic, bic, bse")]
    UnknownMethod(String),

    /// Returned when a search space does not have the shape a tuner needs.
    #[error("malformed search space: {0}")]
    MalformedSpace(String),

    /// Returned in strict mode when one candidate order fails to fit.
    #[error("fitting ARIMA{order} failed")]
    CandidateFailed {
        /// The failing order.
        order: ArimaOrder,
        /// Why the fit failed.
        #[source]
        source: ArimaError,
    },

    /// Returned when no candidate order could be scored.
    #[error("all {count} candidate orders failed to fit")]
    AllCandidatesFailed {
        /// Number of candidates tried.
        count: usize,
    },

    /// Returned by tuners that are declared but not available.
    #[error("{0} is not implemented")]
    Unimplemented(&'static str),

    /// Returned when no differencing order up to the cap is stationary.
    #[error("series is not stationary after {max_d} differences")]
    NotStationary {
        /// The differencing cap.
        max_d: usize,
    },

    /// Returned when search inputs are inconsistent.
    #[error("invalid input: {0}")]
    Validation(String),

    /// ARIMA fitting error.
    #[error(transparent)]
    Arima(#[from] ArimaError),

    /// Gradient-boosting error.
    #[error(transparent)]
    Gbm(#[from] GbmError),

    /// Statistics error.
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// Search-space error.
    #[error(transparent)]
    Space(#[from] SpaceError),
}
