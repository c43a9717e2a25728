//! Fitted ARIMA model results.

use ndarray::Array1;

use crate::error::ArimaError;
use crate::spec::ArimaOrder;
use crate::state_space::StateSpace;

/// A fitted ARIMA(p, q, d) model produced by [`ArimaSpec::fit()`](crate::ArimaSpec::fit).
///
/// Holds the estimated AR (`phi`) and MA (`theta`) coefficients, the
/// innovation variance, the intercept (only for `d == 0`), the
/// one-step-ahead innovations, and the maximised log-likelihood.
///
/// ```mermaid
/// graph LR
///     B["ArimaFit"] --> C[".aic() / .bic()"]
///     B --> D[".bse(): standard errors"]
///     B --> E[".forecast(h)"]
/// ```
#[derive(Clone, Debug)]
pub struct ArimaFit {
    order: ArimaOrder,
    ar: Vec<f64>,
    ma: Vec<f64>,
    sigma2: f64,
    intercept: Option<f64>,
    residuals: Vec<f64>,
    log_likelihood: f64,
    working: Vec<f64>,
    next_state: Array1<f64>,
    level_tails: Vec<f64>,
}

impl ArimaFit {
    /// Creates a new `ArimaFit` (crate-internal constructor).
    ///
    /// `working` is the differenced series before the intercept is removed;
    /// `level_tails[j]` is the last value of the series differenced `j`
    /// times, for `j < d`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        order: ArimaOrder,
        ar: Vec<f64>,
        ma: Vec<f64>,
        sigma2: f64,
        intercept: Option<f64>,
        residuals: Vec<f64>,
        log_likelihood: f64,
        working: Vec<f64>,
        next_state: Array1<f64>,
        level_tails: Vec<f64>,
    ) -> Self {
        Self {
            order,
            ar,
            ma,
            sigma2,
            intercept,
            residuals,
            log_likelihood,
            working,
            next_state,
            level_tails,
        }
    }

    /// Returns the `(p, q, d)` order of the fitted model.
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Returns the AR coefficients (`phi`).
    pub fn ar(&self) -> &[f64] {
        &self.ar
    }

    /// Returns the MA coefficients (`theta`).
    pub fn ma(&self) -> &[f64] {
        &self.ma
    }

    /// Returns the innovation variance (`sigma2`).
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Returns the intercept, present only when `d == 0`.
    pub fn intercept(&self) -> Option<f64> {
        self.intercept
    }

    /// Returns the one-step-ahead prediction errors of the differenced series.
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Returns the maximised log-likelihood.
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// Number of observations entering the likelihood (`n - d`).
    pub fn n_obs(&self) -> usize {
        self.working.len()
    }

    /// Number of estimated parameters.
    pub fn n_params(&self) -> usize {
        self.order.n_params()
    }

    /// Akaike Information Criterion, `2k - 2·loglik`.
    pub fn aic(&self) -> f64 {
        2.0 * self.n_params() as f64 - 2.0 * self.log_likelihood
    }

    /// Bayesian Information Criterion, `k·ln(n) - 2·loglik`.
    pub fn bic(&self) -> f64 {
        self.n_params() as f64 * (self.n_obs() as f64).ln() - 2.0 * self.log_likelihood
    }

    /// Estimated parameter vector, in the order
    /// `[intercept (d == 0 only), ar…, ma…, sigma2]`.
    pub fn params(&self) -> Vec<f64> {
        let mut params = Vec::with_capacity(self.n_params());
        params.extend(self.intercept);
        params.extend_from_slice(&self.ar);
        params.extend_from_slice(&self.ma);
        params.push(self.sigma2);
        params
    }

    /// Standard errors of [`ArimaFit::params()`], from the inverse of the
    /// observed information (numerical Hessian of the log-likelihood).
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ArimaError::SingularCovariance`] | information matrix not positive definite |
    /// | [`ArimaError::NonStationary`] | a perturbed point leaves the stationary region |
    pub fn bse(&self) -> Result<Vec<f64>, ArimaError> {
        crate::hessian::standard_errors(self)
    }

    /// Standard error of the parameter at `index` in [`ArimaFit::params()`].
    ///
    /// # Errors
    ///
    /// [`ArimaError::MissingCoefficient`] when the model has no parameter at
    /// `index`, plus anything [`ArimaFit::bse()`] returns.
    pub fn bse_at(&self, index: usize) -> Result<f64, ArimaError> {
        let len = self.n_params();
        if index >= len {
            return Err(ArimaError::MissingCoefficient { index, len });
        }
        let bse = self.bse()?;
        bse.get(index)
            .copied()
            .ok_or(ArimaError::MissingCoefficient { index, len })
    }

    /// Forecasts the next `horizon` values of the original series.
    ///
    /// The differenced series is projected with the state-space recursion
    /// from the last filtered state, then integrated back `d` times.
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        let ss = StateSpace::new(&self.ar, &self.ma);
        let shift = self.intercept.unwrap_or(0.0);
        let mut state = self.next_state.clone();
        let mut tails = self.level_tails.clone();

        let mut out = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            let mut value = state[0] + shift;
            for tail in tails.iter_mut().rev() {
                value += *tail;
                *tail = value;
            }
            out.push(value);
            state = ss.transition().dot(&state);
        }
        out
    }

    /// Differenced series the ARMA part was fitted to (intercept not removed).
    pub(crate) fn working(&self) -> &[f64] {
        &self.working
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn fit_with(order: ArimaOrder, ar: Vec<f64>, ll: f64, n: usize) -> ArimaFit {
        let r = ar.len().max(1);
        ArimaFit::new(
            order,
            ar,
            vec![0.0; order.q],
            1.0,
            (order.d == 0).then_some(0.0),
            vec![],
            ll,
            vec![0.0; n],
            Array1::zeros(r),
            vec![0.0; order.d],
        )
    }

    #[test]
    fn aic_and_bic() {
        let fit = fit_with(ArimaOrder::new(1, 1, 0), vec![0.5], -100.0, 100);
        // k = 1 (intercept) + 1 + 1 + 1 = 4
        assert_abs_diff_eq!(fit.aic(), 8.0 + 200.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.bic(), 4.0 * 100.0_f64.ln() + 200.0, epsilon = 1e-12);
    }

    #[test]
    fn params_layout_with_intercept() {
        let fit = ArimaFit::new(
            ArimaOrder::new(1, 1, 0),
            vec![0.5],
            vec![0.3],
            2.0,
            Some(1.5),
            vec![],
            0.0,
            vec![],
            Array1::zeros(2),
            vec![],
        );
        assert_eq!(fit.params(), vec![1.5, 0.5, 0.3, 2.0]);
        assert_eq!(fit.n_params(), 4);
    }

    #[test]
    fn params_layout_without_intercept() {
        let fit = fit_with(ArimaOrder::new(1, 0, 1), vec![0.4], 0.0, 10);
        assert_eq!(fit.params(), vec![0.4, 1.0]);
    }

    #[test]
    fn bse_at_out_of_range() {
        let fit = fit_with(ArimaOrder::new(0, 0, 1), vec![], 0.0, 10);
        assert_eq!(
            fit.bse_at(1).unwrap_err(),
            ArimaError::MissingCoefficient { index: 1, len: 1 }
        );
    }

    #[test]
    fn forecast_integrates_random_walk() {
        // ARIMA(0,0,1) with zero innovations: flat at the last level.
        let mut fit = fit_with(ArimaOrder::new(0, 0, 1), vec![], 0.0, 10);
        fit.level_tails = vec![7.0];
        assert_eq!(fit.forecast(3), vec![7.0, 7.0, 7.0]);
    }

    #[test]
    fn forecast_twice_integrated_extends_trend() {
        // Last level 10, last first difference 2: linear continuation.
        let mut fit = fit_with(ArimaOrder::new(0, 0, 2), vec![], 0.0, 10);
        fit.level_tails = vec![10.0, 2.0];
        assert_eq!(fit.forecast(3), vec![12.0, 14.0, 16.0]);
    }

    #[test]
    fn forecast_ar1_decays_to_intercept() {
        let fit = ArimaFit::new(
            ArimaOrder::new(1, 0, 0),
            vec![0.5],
            vec![],
            1.0,
            Some(3.0),
            vec![],
            0.0,
            vec![],
            Array1::from(vec![2.0]),
            vec![],
        );
        let f = fit.forecast(3);
        assert_abs_diff_eq!(f[0], 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f[1], 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f[2], 3.5, epsilon = 1e-12);
    }

    #[test]
    fn forecast_zero_horizon() {
        let fit = fit_with(ArimaOrder::new(1, 0, 0), vec![0.5], 0.0, 10);
        assert!(fit.forecast(0).is_empty());
    }

    #[test]
    fn fit_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<ArimaFit>();
    }
}
