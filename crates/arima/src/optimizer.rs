//! Nelder-Mead optimizer for ARIMA maximum-likelihood estimation.
//!
//! Wraps the `argmin` crate to minimize the negative concentrated
//! log-likelihood of the differenced series over unconstrained PACF
//! parameters.
//!
//! **Not part of the public API.**

use argmin::core::{CostFunction, Executor};
use argmin::solver::neldermead::NelderMead;
use tracing::debug;

use crate::error::ArimaError;
use crate::fit::ArimaFit;
use crate::kalman;
use crate::params;
use crate::spec::ArimaOrder;
use crate::state_space::StateSpace;

/// Fits an ARIMA(p, q, d) model to data via exact MLE.
///
/// 1. Validate data
/// 2. Difference `d` times; centre on the sample mean when `d == 0`
/// 3. Optimize the concentrated log-likelihood via Nelder-Mead
/// 4. Extract final parameters via a full Kalman pass
pub(crate) fn fit_arima(order: ArimaOrder, data: &[f64]) -> Result<ArimaFit, ArimaError> {
    let ArimaOrder { p, q, d } = order;

    // 1. Validate
    if data.is_empty() {
        return Err(ArimaError::EmptyData);
    }
    if !foretune_stats::all_finite(data) {
        return Err(ArimaError::NonFiniteData);
    }
    let min_len = d + p.max(q).max(1) + 1;
    if data.len() < min_len {
        return Err(ArimaError::InsufficientData {
            n: data.len(),
            min: min_len,
        });
    }

    // 2. Difference, then centre
    let working = foretune_stats::difference(data, d);
    if foretune_stats::is_constant(&working) {
        return Err(ArimaError::ConstantData);
    }
    let intercept = (d == 0).then(|| foretune_stats::mean(&working));
    let shift = intercept.unwrap_or(0.0);
    let centred: Vec<f64> = working.iter().map(|x| x - shift).collect();
    let level_tails: Vec<f64> = (0..d)
        .filter_map(|j| foretune_stats::difference(data, j).last().copied())
        .collect();

    // 3. Optimize (ARMA(0,0) needs no search)
    let (ar, ma) = if p + q == 0 {
        (vec![], vec![])
    } else {
        let raw = minimize(&centred, p, q)?;
        params::split(&raw, p)
    };

    // 4. Full Kalman pass for sigma2, residuals, log-likelihood
    let ss = StateSpace::new(&ar, &ma);
    let pass = kalman::filter(&ss, &centred)?;
    let sigma2 = pass.sigma2();
    let log_likelihood = pass.concentrated_loglik();
    if !log_likelihood.is_finite() || sigma2 <= 0.0 {
        return Err(ArimaError::OptimizationFailed);
    }
    debug!(%order, sigma2, log_likelihood, "fitted ARIMA");

    Ok(ArimaFit::new(
        order,
        ar,
        ma,
        sigma2,
        intercept,
        pass.innovations,
        log_likelihood,
        working,
        pass.next_state,
        level_tails,
    ))
}

/// Runs Nelder-Mead from the origin and returns the best unconstrained vector.
fn minimize(data: &[f64], p: usize, q: usize) -> Result<Vec<f64>, ArimaError> {
    let dim = p + q;
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    simplex.push(vec![0.0; dim]);
    for i in 0..dim {
        let mut vertex = vec![0.0; dim];
        vertex[i] = 0.5;
        simplex.push(vertex);
    }

    let cost = ArimaCost { data, p };
    let solver = NelderMead::new(simplex)
        .with_sd_tolerance(1e-8)
        .map_err(|_| ArimaError::OptimizationFailed)?;
    let result = Executor::new(cost, solver)
        .configure(|state| state.max_iters(1000))
        .run()
        .map_err(|_| ArimaError::OptimizationFailed)?;

    result
        .state()
        .best_param
        .clone()
        .ok_or(ArimaError::OptimizationFailed)
}

/// Full log-likelihood of `working` at an explicit parameter vector laid out
/// as `[intercept (d == 0 only), ar…, ma…, sigma2]`.
pub(crate) fn loglik_at(
    order: ArimaOrder,
    working: &[f64],
    theta: &[f64],
) -> Result<f64, ArimaError> {
    let offset = usize::from(order.d == 0);
    let shift = if offset == 1 { theta[0] } else { 0.0 };
    let ar = &theta[offset..offset + order.p];
    let ma = &theta[offset + order.p..offset + order.p + order.q];
    let sigma2 = theta[offset + order.p + order.q];
    if sigma2 <= 0.0 {
        return Err(ArimaError::SingularCovariance);
    }

    let centred: Vec<f64> = working.iter().map(|x| x - shift).collect();
    let pass = kalman::filter(&StateSpace::new(ar, ma), &centred)?;
    Ok(pass.loglik_at(sigma2))
}

/// Cost function for argmin: negative concentrated log-likelihood.
struct ArimaCost<'a> {
    data: &'a [f64],
    p: usize,
}

impl CostFunction for ArimaCost<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, raw: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        let (ar, ma) = params::split(raw, self.p);
        let ss = StateSpace::new(&ar, &ma);

        match kalman::filter(&ss, self.data) {
            Ok(pass) => {
                let loglik = pass.concentrated_loglik();
                Ok(if loglik.is_finite() { -loglik } else { f64::MAX })
            }
            Err(_) => Ok(f64::MAX),
        }
    }
}
