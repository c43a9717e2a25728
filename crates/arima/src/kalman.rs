//! Kalman filter for ARMA likelihood evaluation.
//!
//! Univariate filter over the state-space form from [`crate::state_space`],
//! run with unit innovation variance so that `sigma2` can be concentrated
//! out of the likelihood. The exact Gaussian log-likelihood follows from
//! the prediction error decomposition.
//!
//! **Not part of the public API.**

use std::f64::consts::PI;

use ndarray::{Array1, Axis};

use crate::error::ArimaError;
use crate::state_space::StateSpace;

/// Sufficient statistics of one filter pass (unit variance scale).
#[derive(Clone, Debug)]
pub(crate) struct FilterPass {
    /// One-step-ahead prediction errors `v[t]`.
    pub(crate) innovations: Vec<f64>,
    /// `Σ ln F[t]`.
    pub(crate) sum_log_f: f64,
    /// `Σ v[t]² / F[t]`.
    pub(crate) sum_scaled_sq: f64,
    /// Predicted state after the last observation, `a[n+1|n]`.
    pub(crate) next_state: Array1<f64>,
}

impl FilterPass {
    fn n(&self) -> f64 {
        self.innovations.len() as f64
    }

    /// Maximum-likelihood innovation variance given the ARMA coefficients.
    pub(crate) fn sigma2(&self) -> f64 {
        self.sum_scaled_sq / self.n()
    }

    /// Log-likelihood with `sigma2` concentrated out.
    pub(crate) fn concentrated_loglik(&self) -> f64 {
        let n = self.n();
        -0.5 * n * ((2.0 * PI).ln() + 1.0 + self.sigma2().ln()) - 0.5 * self.sum_log_f
    }

    /// Full log-likelihood at an explicit `sigma2`.
    pub(crate) fn loglik_at(&self, sigma2: f64) -> f64 {
        let n = self.n();
        -0.5 * n * (2.0 * PI).ln()
            - 0.5 * n * sigma2.ln()
            - 0.5 * self.sum_log_f
            - 0.5 * self.sum_scaled_sq / sigma2
    }
}

/// Runs the filter over `data` (already differenced and centred).
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`ArimaError::NonStationary`] | no stationary initial covariance |
/// | [`ArimaError::NumericalFailure`] | `F[t]` non-positive or non-finite |
pub(crate) fn filter(ss: &StateSpace, data: &[f64]) -> Result<FilterPass, ArimaError> {
    let t_mat = ss.transition();
    let mut a = Array1::<f64>::zeros(ss.dim());
    let mut p = ss.stationary_covariance()?;

    let mut innovations = Vec::with_capacity(data.len());
    let mut sum_log_f = 0.0;
    let mut sum_scaled_sq = 0.0;

    for (t, &y) in data.iter().enumerate() {
        let f = p[[0, 0]];
        if !f.is_finite() || f <= 0.0 {
            return Err(ArimaError::NumericalFailure { t });
        }
        let v = y - a[0];
        innovations.push(v);
        sum_log_f += f.ln();
        sum_scaled_sq += v * v / f;

        // Measurement update with Z = e1.
        let pz = p.column(0).to_owned();
        let a_filt = &a + &(&pz * (v / f));
        let pz_col = pz.view().insert_axis(Axis(1));
        let pz_row = pz.view().insert_axis(Axis(0));
        let p_filt = &p - &(pz_col.dot(&pz_row) / f);

        // Time update.
        a = t_mat.dot(&a_filt);
        p = t_mat.dot(&p_filt).dot(&t_mat.t()) + ss.noise_cov();
    }

    Ok(FilterPass {
        innovations,
        sum_log_f,
        sum_scaled_sq,
        next_state: a,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn white_noise_reduces_to_iid_gaussian() {
        let data = [0.5, -1.0, 1.5, 0.0];
        let pass = filter(&StateSpace::new(&[], &[]), &data).unwrap();
        assert_abs_diff_eq!(pass.sum_log_f, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pass.sum_scaled_sq, 0.25 + 1.0 + 2.25, epsilon = 1e-12);
        assert_eq!(pass.innovations, data.to_vec());
        assert_abs_diff_eq!(pass.sigma2(), 3.5 / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn ar1_matches_exact_likelihood() {
        // Exact AR(1) likelihood: first observation has variance 1/(1-phi^2),
        // later ones are conditionally N(phi*y[t-1], 1).
        let phi: f64 = 0.6;
        let data = [0.3, -0.2, 0.8, 0.1, -0.5];
        let pass = filter(&StateSpace::new(&[phi], &[]), &data).unwrap();

        let v0 = 1.0 / (1.0 - phi * phi);
        let mut expected = -0.5 * ((2.0 * PI).ln() + v0.ln() + data[0] * data[0] / v0);
        for t in 1..data.len() {
            let e = data[t] - phi * data[t - 1];
            expected += -0.5 * ((2.0 * PI).ln() + e * e);
        }
        assert_abs_diff_eq!(pass.loglik_at(1.0), expected, epsilon = 1e-10);
    }

    #[test]
    fn concentrated_equals_full_at_mle_sigma2() {
        let data = [0.3, -0.2, 0.8, 0.1, -0.5, 0.9];
        let pass = filter(&StateSpace::new(&[0.4], &[0.3]), &data).unwrap();
        assert_abs_diff_eq!(
            pass.concentrated_loglik(),
            pass.loglik_at(pass.sigma2()),
            epsilon = 1e-10
        );
    }

    #[test]
    fn ar1_next_state_is_one_step_forecast() {
        let pass = filter(&StateSpace::new(&[0.5], &[]), &[1.0, 2.0]).unwrap();
        assert_abs_diff_eq!(pass.next_state[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn non_stationary_rejected() {
        let err = filter(&StateSpace::new(&[1.2], &[]), &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, ArimaError::NonStationary);
    }
}
