//! Unfitted ARIMA estimator bound to a training series.

use crate::error::ArimaError;
use crate::fit::ArimaFit;
use crate::spec::{ArimaOrder, ArimaSpec};

/// An ARIMA model configured with a training series and an order, ready
/// to be fitted.
///
/// This is what a grid search hands back: the winning order together with
/// the data it was selected on. Construction never fits; call
/// [`ArimaEstimator::fit()`] when the model is needed.
#[derive(Clone, Debug, PartialEq)]
pub struct ArimaEstimator {
    train: Vec<f64>,
    order: ArimaOrder,
}

impl ArimaEstimator {
    /// Binds `order` to a copy of `train`.
    pub fn new(train: &[f64], order: ArimaOrder) -> Self {
        Self {
            train: train.to_vec(),
            order,
        }
    }

    /// Returns the configured order.
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Returns the training series.
    pub fn train(&self) -> &[f64] {
        &self.train
    }

    /// Fits the configured order to the training series.
    ///
    /// # Errors
    ///
    /// Anything [`ArimaSpec::fit()`] returns.
    pub fn fit(&self) -> Result<ArimaFit, ArimaError> {
        ArimaSpec::from(self.order).fit(&self.train)
    }
}
