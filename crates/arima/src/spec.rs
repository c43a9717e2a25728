//! ARIMA model order and unfitted specification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ArimaError;
use crate::fit::ArimaFit;

/// ARIMA order `(p, q, d)`: autoregressive order, moving-average order,
/// and differencing order.
///
/// Displayed as `(p, q, d)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// Autoregressive order.
    pub p: usize,
    /// Moving-average order.
    pub q: usize,
    /// Differencing order.
    pub d: usize,
}

impl ArimaOrder {
    /// Creates an order from its three components.
    pub fn new(p: usize, q: usize, d: usize) -> Self {
        Self { p, q, d }
    }

    /// Returns the order as a `(p, q, d)` tuple.
    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.p, self.q, self.d)
    }

    /// Number of estimated parameters: intercept (only when `d == 0`),
    /// AR and MA coefficients, and the innovation variance.
    pub fn n_params(&self) -> usize {
        usize::from(self.d == 0) + self.p + self.q + 1
    }
}

impl From<(usize, usize, usize)> for ArimaOrder {
    fn from((p, q, d): (usize, usize, usize)) -> Self {
        Self { p, q, d }
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.p, self.q, self.d)
    }
}

/// An unfitted ARIMA(p, q, d) model specification.
///
/// Entry point of the typestate workflow: create a spec with
/// [`ArimaSpec::new()`], then call [`ArimaSpec::fit()`] to obtain an
/// [`ArimaFit`].
///
/// ```mermaid
/// graph LR
///     A["ArimaSpec::new(p, q, d)"] -->|".fit(&data)?"| B["ArimaFit"]
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArimaSpec {
    order: ArimaOrder,
}

impl ArimaSpec {
    /// Creates a new ARIMA specification with AR order `p`, MA order `q`
    /// and differencing order `d`.
    ///
    /// # Example
    ///
    /// ```
    /// use foretune_arima::ArimaSpec;
    ///
    /// let spec = ArimaSpec::new(2, 1, 0);
    /// assert_eq!(spec.order().as_tuple(), (2, 1, 0));
    /// ```
    pub fn new(p: usize, q: usize, d: usize) -> Self {
        Self {
            order: ArimaOrder::new(p, q, d),
        }
    }

    /// Returns the model order.
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Fits this specification to `data` by exact maximum likelihood.
    ///
    /// The series is differenced `d` times; when `d == 0` the sample mean
    /// is removed and reported as the intercept. The ARMA(p, q) part is then
    /// estimated through a Kalman filter.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ArimaError::EmptyData`] | `data` is empty |
    /// | [`ArimaError::NonFiniteData`] | any element is NaN or infinite |
    /// | [`ArimaError::InsufficientData`] | `data.len() < d + max(p, q, 1) + 1` |
    /// | [`ArimaError::ConstantData`] | the differenced series is constant |
    /// | [`ArimaError::OptimizationFailed`] | optimiser fails to converge |
    /// | [`ArimaError::NumericalFailure`] | Kalman filter breaks down |
    pub fn fit(&self, data: &[f64]) -> Result<ArimaFit, ArimaError> {
        crate::optimizer::fit_arima(self.order, data)
    }
}

impl From<ArimaOrder> for ArimaSpec {
    fn from(order: ArimaOrder) -> Self {
        Self { order }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_display() {
        assert_eq!(ArimaOrder::new(2, 1, 0).to_string(), "(2, 1, 0)");
    }

    #[test]
    fn order_from_tuple() {
        let order: ArimaOrder = (1, 2, 3).into();
        assert_eq!(order.p, 1);
        assert_eq!(order.q, 2);
        assert_eq!(order.d, 3);
        assert_eq!(order.as_tuple(), (1, 2, 3));
    }

    #[test]
    fn n_params_counts_intercept_only_without_differencing() {
        assert_eq!(ArimaOrder::new(1, 1, 0).n_params(), 4);
        assert_eq!(ArimaOrder::new(1, 1, 1).n_params(), 3);
        assert_eq!(ArimaOrder::new(0, 0, 2).n_params(), 1);
    }

    #[test]
    fn spec_round_trip() {
        let spec = ArimaSpec::new(2, 1, 1);
        assert_eq!(spec.order(), ArimaOrder::new(2, 1, 1));
        assert_eq!(ArimaSpec::from(ArimaOrder::new(2, 1, 1)), spec);
    }

    #[test]
    fn order_serde_round_trip() {
        let json = serde_json::to_string(&ArimaOrder::new(3, 0, 1)).unwrap();
        assert_eq!(json, r#"{"p":3,"q":0,"d":1}"#);
        let back: ArimaOrder = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ArimaOrder::new(3, 0, 1));
    }

    #[test]
    fn fit_empty_data() {
        let err = ArimaSpec::new(1, 0, 0).fit(&[]).unwrap_err();
        assert_eq!(err, ArimaError::EmptyData);
    }

    #[test]
    fn fit_insufficient_data_counts_differencing() {
        let err = ArimaSpec::new(1, 0, 2).fit(&[1.0, 2.0, 4.0]).unwrap_err();
        assert!(matches!(err, ArimaError::InsufficientData { n: 3, min: 4 }));
    }

    #[test]
    fn fit_nan_data() {
        let err = ArimaSpec::new(1, 0, 0)
            .fit(&[1.0, f64::NAN, 3.0])
            .unwrap_err();
        assert_eq!(err, ArimaError::NonFiniteData);
    }

    #[test]
    fn fit_linear_trend_is_constant_after_differencing() {
        let data: Vec<f64> = (0..20).map(|t| 2.0 * t as f64).collect();
        let err = ArimaSpec::new(0, 0, 1).fit(&data).unwrap_err();
        assert_eq!(err, ArimaError::ConstantData);
    }
}
