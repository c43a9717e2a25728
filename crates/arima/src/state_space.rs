//! Companion-form state space of the stationary ARMA(p, q) part.
//!
//! ```text
//! state[t+1] = transition · state[t] + selection · e[t]
//! y[t]       = state[t][0]
//! ```
//!
//! with `e[t] ~ N(0, sigma2)`.
//!
//! **Not part of the public API.**

use ndarray::{Array1, Array2};

use crate::error::ArimaError;

/// Doubling iterations before the Lyapunov solve is declared divergent.
const MAX_DOUBLING: usize = 64;

#[derive(Clone, Debug)]
pub(crate) struct StateSpace {
    transition: Array2<f64>,
    selection: Array1<f64>,
    noise_cov: Array2<f64>,
}

impl StateSpace {
    /// AR coefficients fill the first column of the transition, ones sit on
    /// the super-diagonal; the selection vector is `[1, θ₁, …, θ_q, 0, …]`.
    pub(crate) fn new(ar: &[f64], ma: &[f64]) -> Self {
        let dim = ar.len().max(ma.len() + 1);
        let transition = Array2::from_shape_fn((dim, dim), |(i, j)| match j {
            0 => ar.get(i).copied().unwrap_or(0.0),
            _ if j == i + 1 => 1.0,
            _ => 0.0,
        });
        let selection = Array1::from_shape_fn(dim, |i| match i {
            0 => 1.0,
            _ => ma.get(i - 1).copied().unwrap_or(0.0),
        });
        let noise_cov = Array2::from_shape_fn((dim, dim), |(i, j)| selection[i] * selection[j]);

        Self {
            transition,
            selection,
            noise_cov,
        }
    }

    /// State dimension `max(p, q + 1)`.
    pub(crate) fn dim(&self) -> usize {
        self.selection.len()
    }

    pub(crate) fn transition(&self) -> &Array2<f64> {
        &self.transition
    }

    #[cfg(test)]
    pub(crate) fn selection(&self) -> &Array1<f64> {
        &self.selection
    }

    /// Selection outer product, the state noise covariance per unit `sigma2`.
    pub(crate) fn noise_cov(&self) -> &Array2<f64> {
        &self.noise_cov
    }

    /// Initial state covariance: the fixed point of
    /// `P = transition · P · transitionᵀ + noise_cov`, by doubling.
    ///
    /// # Errors
    ///
    /// [`ArimaError::NonStationary`] when the recursion blows up or fails to
    /// settle, i.e. the AR polynomial has a root on or inside the unit circle.
    pub(crate) fn stationary_covariance(&self) -> Result<Array2<f64>, ArimaError> {
        let mut cov = self.noise_cov.clone();
        let mut power = self.transition.clone();

        for _ in 0..MAX_DOUBLING {
            let increment = power.dot(&cov).dot(&power.t());
            cov += &increment;
            power = power.dot(&power);

            if cov.iter().any(|v| !v.is_finite()) {
                return Err(ArimaError::NonStationary);
            }
            let step = increment.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
            let scale = cov.iter().fold(1.0_f64, |m, v| m.max(v.abs()));
            if step <= 1e-14 * scale {
                return Ok(cov);
            }
        }
        Err(ArimaError::NonStationary)
    }
}
