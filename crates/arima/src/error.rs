//! Error types for the foretune-arima crate.

/// Error type for all fallible operations in the foretune-arima crate.
///
/// Covers input validation, numerical issues in the Kalman filter, and
/// failures of the likelihood optimiser or of the standard-error
/// computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArimaError {
    /// Returned for an empty training series.
    #[error("training series is empty")]
    EmptyData,

    /// Returned when the series is too short for the requested order.
    #[error("series of length {n} is too short for this order (minimum {min})")]
    InsufficientData {
        /// Series length.
        n: usize,
        /// Minimum length for the order.
        min: usize,
    },

    /// Returned when the series holds NaN or infinity.
    #[error("training series contains NaN or infinite values")]
    NonFiniteData,

    /// Returned when the (differenced) data has zero variance.
    #[error("series is constant after differencing")]
    ConstantData,

    /// Returned when the AR part has no stationary state covariance.
    #[error("AR part is not stationary")]
    NonStationary,

    /// Returned when Nelder-Mead produces no usable parameter vector.
    #[error("likelihood maximisation did not return a finite optimum")]
    OptimizationFailed,

    /// Returned when the Kalman filter produces a non-positive or
    /// non-finite prediction variance.
    #[error("numerical failure in Kalman filter at t={t}")]
    NumericalFailure {
        /// Time index at which the filter broke down.
        t: usize,
    },

    /// Returned when the observed information matrix cannot be inverted.
    #[error("parameter covariance is singular or not positive definite")]
    SingularCovariance,

    /// Returned when a coefficient index is beyond the parameter vector.
    #[error("no coefficient at index {index}: model has {len} parameters")]
    MissingCoefficient {
        /// The requested index.
        index: usize,
        /// Number of parameters in the model.
        len: usize,
    },
}
