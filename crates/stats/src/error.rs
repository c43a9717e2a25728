//! Error types for the foretune-stats crate.

/// Error type for all fallible operations in the foretune-stats crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    /// Returned when the input data is empty.
    #[error("input data is empty")]
    EmptyData,

    /// Returned when the input data contains NaN or infinity.
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when the input data has zero variance.
    #[error("input data is constant (zero variance)")]
    ConstantData,

    /// Returned when there are too few observations for the requested computation.
    #[error("insufficient data: got {n} observations, need at least {min}")]
    InsufficientData {
        /// Number of observations provided.
        n: usize,
        /// Minimum number of observations required.
        min: usize,
    },

    /// Returned when a matrix expected to be symmetric positive definite is not.
    #[error("matrix is not positive definite")]
    NotPositiveDefinite,

    /// Returned when matrix and vector shapes disagree.
    #[error("dimension mismatch: matrix has {rows} rows, vector has {len} elements")]
    DimensionMismatch {
        /// Number of matrix rows.
        rows: usize,
        /// Length of the vector.
        len: usize,
    },
}
