//! Error types for the foretune-gbm crate.

/// Error type for all fallible operations in the foretune-gbm crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GbmError {
    /// Returned when the training set has no rows or no features.
    #[error("training data is empty")]
    EmptyData,

    /// Returned when features or targets contain NaN or infinity.
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when the feature matrix and target disagree in length.
    #[error("feature matrix has {rows} rows but target has {len} values")]
    DimensionMismatch {
        /// Rows in the feature matrix.
        rows: usize,
        /// Length of the target vector.
        len: usize,
    },

    /// Returned when a prediction matrix has a different feature count
    /// than the training matrix.
    #[error("model was trained on {expected} features, got {got}")]
    FeatureMismatch {
        /// Feature count seen during training.
        expected: usize,
        /// Feature count supplied.
        got: usize,
    },

    /// Returned when a hyperparameter is outside its valid range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
}
