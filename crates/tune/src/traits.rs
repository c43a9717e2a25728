//! Capability traits implemented by the tuners.

use ndarray::{ArrayView1, ArrayView2};

use crate::error::TuneError;
use crate::space::HyperparameterSpace;

/// Exhaustive search over a discrete grid, ranked by a named method.
pub trait GridSearch {
    /// What a successful search returns.
    type Output;

    /// Scores every grid point on `train` with `method` and returns the best.
    ///
    /// # Errors
    ///
    /// Implementation specific; see each tuner.
    fn grid_search(
        &self,
        space: &HyperparameterSpace,
        method: &str,
        train: &[f64],
    ) -> Result<Self::Output, TuneError>;
}

/// Model-based search over a continuous/discrete space on tabular data.
pub trait BayesianOptimisation {
    /// What a successful search returns.
    type Output;

    /// Searches hyperparameters for a regressor of `y` on `x`.
    ///
    /// # Errors
    ///
    /// Implementation specific; see each tuner.
    fn bayesian_optimisation(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Self::Output, TuneError>;
}
