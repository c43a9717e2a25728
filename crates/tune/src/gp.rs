//! Gaussian-process surrogate and expected improvement.
//!
//! Zero-mean GP with a squared-exponential kernel over normalised
//! coordinates and standardised targets. The length scale is chosen from a
//! small grid by log marginal likelihood.
//!
//! **Not part of the public API.**

use std::f64::consts::PI;

use foretune_stats::linalg;
use ndarray::{Array1, Array2};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

use crate::error::TuneError;

const LENGTH_SCALES: [f64; 5] = [0.05, 0.1, 0.2, 0.5, 1.0];
const NOISE: f64 = 1e-6;

/// A fitted GP posterior.
#[derive(Clone, Debug)]
pub(crate) struct GaussianProcess {
    points: Vec<Vec<f64>>,
    chol: Array2<f64>,
    alpha: Array1<f64>,
    length_scale: f64,
    y_mean: f64,
    y_scale: f64,
}

fn kernel(a: &[f64], b: &[f64], length_scale: f64) -> f64 {
    let sq: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
    (-0.5 * sq / (length_scale * length_scale)).exp()
}

fn gram(points: &[Vec<f64>], length_scale: f64) -> Array2<f64> {
    let n = points.len();
    Array2::from_shape_fn((n, n), |(i, j)| {
        kernel(&points[i], &points[j], length_scale) + if i == j { NOISE } else { 0.0 }
    })
}

impl GaussianProcess {
    /// Conditions the GP on observations `y` at `points`.
    ///
    /// # Errors
    ///
    /// [`TuneError::Validation`] on empty or mismatched input, or when no
    /// candidate length scale yields a positive definite kernel.
    pub(crate) fn fit(points: &[Vec<f64>], y: &[f64]) -> Result<Self, TuneError> {
        if points.is_empty() || points.len() != y.len() {
            return Err(TuneError::Validation(format!(
                "surrogate needs matching points and targets, got {} and {}",
                points.len(),
                y.len()
            )));
        }
        let y_mean = foretune_stats::mean(y);
        let sd = foretune_stats::sd(y);
        let y_scale = if sd.is_finite() && sd > 0.0 { sd } else { 1.0 };
        let target: Array1<f64> = y.iter().map(|v| (v - y_mean) / y_scale).collect();
        let n = y.len() as f64;

        let mut best: Option<(f64, Self)> = None;
        for length_scale in LENGTH_SCALES {
            let Ok(chol) = linalg::cholesky(&gram(points, length_scale)) else {
                continue;
            };
            let alpha = linalg::cholesky_solve(&chol, &target)?;
            let lml = -0.5 * target.dot(&alpha)
                - 0.5 * linalg::log_det_cholesky(&chol)
                - 0.5 * n * (2.0 * PI).ln();
            if !lml.is_finite() || best.as_ref().is_some_and(|(b, _)| lml <= *b) {
                continue;
            }
            best = Some((
                lml,
                Self {
                    points: points.to_vec(),
                    chol,
                    alpha,
                    length_scale,
                    y_mean,
                    y_scale,
                },
            ));
        }
        best.map(|(_, gp)| gp).ok_or_else(|| {
            TuneError::Validation("surrogate kernel is not positive definite".into())
        })
    }

    /// Selected kernel length scale.
    #[cfg(test)]
    pub(crate) fn length_scale(&self) -> f64 {
        self.length_scale
    }

    /// Posterior mean and standard deviation at `x`, in target units.
    pub(crate) fn predict(&self, x: &[f64]) -> Result<(f64, f64), TuneError> {
        let k: Array1<f64> = self
            .points
            .iter()
            .map(|p| kernel(p, x, self.length_scale))
            .collect();
        let mean = k.dot(&self.alpha);
        let v = linalg::forward_solve(&self.chol, &k)?;
        let var = (1.0 + NOISE - v.dot(&v)).max(0.0);
        Ok((
            self.y_mean + self.y_scale * mean,
            self.y_scale * var.sqrt(),
        ))
    }
}

/// Expected improvement below `best` for a minimisation problem.
pub(crate) fn expected_improvement(mean: f64, sd: f64, best: f64, xi: f64) -> f64 {
    let improvement = best - mean - xi;
    if sd <= 1e-12 {
        return improvement.max(0.0);
    }
    let z = improvement / sd;
    match Normal::new(0.0, 1.0) {
        Ok(std_normal) => improvement * std_normal.cdf(z) + sd * std_normal.pdf(z),
        Err(_) => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn line_points() -> (Vec<Vec<f64>>, Vec<f64>) {
        let points: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64 / 5.0]).collect();
        let y = points.iter().map(|p| (3.0 * p[0]).sin()).collect();
        (points, y)
    }

    #[test]
    fn interpolates_training_points() {
        let (points, y) = line_points();
        let gp = GaussianProcess::fit(&points, &y).unwrap();
        for (p, target) in points.iter().zip(&y) {
            let (mean, sd) = gp.predict(p).unwrap();
            assert_abs_diff_eq!(mean, *target, epsilon = 1e-2);
            assert!(sd < 5e-2, "sd = {sd}");
        }
    }

    #[test]
    fn uncertainty_grows_away_from_data() {
        let points = vec![vec![0.0], vec![0.1]];
        let gp = GaussianProcess::fit(&points, &[1.0, 2.0]).unwrap();
        let (_, near) = gp.predict(&[0.05]).unwrap();
        let (_, far) = gp.predict(&[1.0]).unwrap();
        assert!(far > near);
    }

    #[test]
    fn constant_targets_do_not_break_scaling() {
        let points = vec![vec![0.0], vec![0.5], vec![1.0]];
        let gp = GaussianProcess::fit(&points, &[2.0, 2.0, 2.0]).unwrap();
        let (mean, _) = gp.predict(&[0.25]).unwrap();
        assert_abs_diff_eq!(mean, 2.0, epsilon = 1e-9);
        assert!(LENGTH_SCALES.contains(&gp.length_scale()));
    }

    #[test]
    fn rejects_mismatched_input() {
        let err = GaussianProcess::fit(&[vec![0.0]], &[]).unwrap_err();
        assert!(matches!(err, TuneError::Validation(_)));
    }

    #[test]
    fn expected_improvement_properties() {
        // Deterministic prediction: plain improvement.
        assert_abs_diff_eq!(expected_improvement(1.0, 0.0, 3.0, 0.0), 2.0);
        assert_abs_diff_eq!(expected_improvement(5.0, 0.0, 3.0, 0.0), 0.0);
        // At the incumbent, EI = sd * pdf(0).
        let ei = expected_improvement(3.0, 1.0, 3.0, 0.0);
        assert_abs_diff_eq!(ei, 1.0 / (2.0 * PI).sqrt(), epsilon = 1e-12);
        // More uncertainty, more expected improvement.
        let wide = expected_improvement(3.0, 2.0, 3.0, 0.01);
        let narrow = expected_improvement(3.0, 1.0, 3.0, 0.01);
        assert!(wide > narrow);
    }
}
