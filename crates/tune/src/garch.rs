//! GARCH order search placeholder.

use serde::{Deserialize, Serialize};

use crate::error::TuneError;
use crate::space::HyperparameterSpace;
use crate::traits::GridSearch;

/// GARCH(p, q) order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GarchOrder {
    /// ARCH order.
    pub p: usize,
    /// GARCH order.
    pub q: usize,
}

/// Declared grid search over GARCH orders. No GARCH model exists in the
/// workspace, so every search fails with [`TuneError::Unimplemented`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GarchTuner;

impl GarchTuner {
    /// Creates the tuner.
    pub fn new() -> Self {
        Self
    }
}

impl GridSearch for GarchTuner {
    type Output = GarchOrder;

    fn grid_search(
        &self,
        _space: &HyperparameterSpace,
        _method: &str,
        _train: &[f64],
    ) -> Result<Self::Output, TuneError> {
        Err(TuneError::Unimplemented("GARCH grid search"))
    }
}
