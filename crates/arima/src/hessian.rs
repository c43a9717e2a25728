//! Numerical observed information for ARIMA standard errors.
//!
//! Central-difference Hessian of the full log-likelihood, taken over the
//! natural parameters `[intercept, ar…, ma…, sigma2]`. The covariance of
//! the estimates is the inverse of the negated Hessian.
//!
//! **Not part of the public API.**

use ndarray::Array2;
use tracing::debug;

use crate::error::ArimaError;
use crate::fit::ArimaFit;
use crate::optimizer;

/// Relative step for the finite differences.
const REL_STEP: f64 = 1e-4;
/// Floor on the magnitude used to scale a step.
const MIN_SCALE: f64 = 1e-2;

/// Standard errors of [`ArimaFit::params()`].
pub(crate) fn standard_errors(fit: &ArimaFit) -> Result<Vec<f64>, ArimaError> {
    let theta = fit.params();
    let hessian = hessian(fit, &theta)?;
    let info = hessian.mapv(|v| -v);

    let cov = foretune_stats::linalg::invert_spd(&info).map_err(|err| {
        debug!(order = %fit.order(), %err, "observed information not invertible");
        ArimaError::SingularCovariance
    })?;

    cov.diag()
        .iter()
        .map(|&v| {
            if v.is_finite() && v > 0.0 {
                Ok(v.sqrt())
            } else {
                Err(ArimaError::SingularCovariance)
            }
        })
        .collect()
}

fn hessian(fit: &ArimaFit, theta: &[f64]) -> Result<Array2<f64>, ArimaError> {
    let k = theta.len();
    let order = fit.order();
    let working = fit.working();
    let steps: Vec<f64> = theta
        .iter()
        .map(|x| REL_STEP * x.abs().max(MIN_SCALE))
        .collect();

    let eval = |shifts: &[(usize, f64)]| -> Result<f64, ArimaError> {
        let mut point = theta.to_vec();
        for &(i, delta) in shifts {
            point[i] += delta;
        }
        optimizer::loglik_at(order, working, &point)
    };

    let f0 = eval(&[])?;
    let mut h = Array2::zeros((k, k));
    for i in 0..k {
        let hi = steps[i];
        let plus = eval(&[(i, hi)])?;
        let minus = eval(&[(i, -hi)])?;
        h[[i, i]] = (plus - 2.0 * f0 + minus) / (hi * hi);

        for j in 0..i {
            let hj = steps[j];
            let pp = eval(&[(i, hi), (j, hj)])?;
            let pm = eval(&[(i, hi), (j, -hj)])?;
            let mp = eval(&[(i, -hi), (j, hj)])?;
            let mm = eval(&[(i, -hi), (j, -hj)])?;
            let v = (pp - pm - mp + mm) / (4.0 * hi * hj);
            h[[i, j]] = v;
            h[[j, i]] = v;
        }
    }

    if h.iter().any(|v| !v.is_finite()) {
        return Err(ArimaError::SingularCovariance);
    }
    Ok(h)
}
