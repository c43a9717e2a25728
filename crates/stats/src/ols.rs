//! Ordinary least squares via the normal equations.

use ndarray::{Array1, Array2};

use crate::error::StatsError;
use crate::linalg;

/// Result of an ordinary least squares regression.
#[derive(Clone, Debug)]
pub struct OlsFit {
    coefficients: Array1<f64>,
    std_errors: Array1<f64>,
    ssr: f64,
    n_obs: usize,
}

impl OlsFit {
    /// Estimated coefficients, one per design-matrix column.
    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    /// Classical standard errors `sqrt(s² · diag((XᵀX)⁻¹))`.
    pub fn std_errors(&self) -> &Array1<f64> {
        &self.std_errors
    }

    /// Sum of squared residuals.
    pub fn ssr(&self) -> f64 {
        self.ssr
    }

    /// Number of observations (design-matrix rows).
    pub fn n_obs(&self) -> usize {
        self.n_obs
    }

    /// t-statistic of coefficient `i`, or `None` when `i` is out of range.
    pub fn t_stat(&self, i: usize) -> Option<f64> {
        let coef = self.coefficients.get(i)?;
        let se = self.std_errors.get(i)?;
        Some(coef / se)
    }

    /// Gaussian AIC used for lag selection: `n·ln(ssr/n) + 2k`.
    pub fn aic(&self) -> f64 {
        let n = self.n_obs as f64;
        let k = self.coefficients.len() as f64;
        n * (self.ssr / n).ln() + 2.0 * k
    }
}

/// Regresses `y` on the columns of `x`.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`StatsError::DimensionMismatch`] | `x.nrows() != y.len()` |
/// | [`StatsError::InsufficientData`] | fewer rows than columns + 1 |
/// | [`StatsError::NotPositiveDefinite`] | collinear design matrix |
pub fn ols(y: &Array1<f64>, x: &Array2<f64>) -> Result<OlsFit, StatsError> {
    let n = x.nrows();
    let k = x.ncols();
    if y.len() != n {
        return Err(StatsError::DimensionMismatch {
            rows: n,
            len: y.len(),
        });
    }
    if n <= k {
        return Err(StatsError::InsufficientData { n, min: k + 1 });
    }

    let xtx = x.t().dot(x);
    let xty = x.t().dot(y);
    let l = linalg::cholesky(&xtx)?;
    let coefficients = linalg::cholesky_solve(&l, &xty)?;

    let residuals = y - &x.dot(&coefficients);
    let ssr = residuals.dot(&residuals);
    let s2 = ssr / (n - k) as f64;

    let xtx_inv = linalg::invert_spd(&xtx)?;
    let std_errors = xtx_inv.diag().mapv(|v| (s2 * v).max(0.0).sqrt());

    Ok(OlsFit {
        coefficients,
        std_errors,
        ssr,
        n_obs: n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn exact_line_has_zero_ssr() {
        // y = 1 + 2x
        let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 3.0]];
        let y = array![1.0, 3.0, 5.0, 7.0];
        let fit = ols(&y, &x).unwrap();
        assert_abs_diff_eq!(fit.coefficients()[0], 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.coefficients()[1], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.ssr(), 0.0, epsilon = 1e-10);
        assert_eq!(fit.n_obs(), 4);
    }

    #[test]
    fn noisy_line_standard_errors_positive() {
        let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 3.0], [1.0, 4.0]];
        let y = array![0.9, 3.2, 4.8, 7.1, 9.0];
        let fit = ols(&y, &x).unwrap();
        assert!(fit.std_errors().iter().all(|&s| s > 0.0));
        let t = fit.t_stat(1).unwrap();
        assert!(t > 10.0, "slope t-stat = {t}");
        assert!(fit.t_stat(5).is_none());
    }

    #[test]
    fn too_few_rows() {
        let x = array![[1.0, 0.0], [1.0, 1.0]];
        let y = array![1.0, 2.0];
        assert!(matches!(
            ols(&y, &x),
            Err(StatsError::InsufficientData { n: 2, min: 3 })
        ));
    }

    #[test]
    fn row_mismatch() {
        let x = array![[1.0], [1.0], [1.0]];
        let y = array![1.0, 2.0];
        assert!(matches!(ols(&y, &x), Err(StatsError::DimensionMismatch { .. })));
    }

    #[test]
    fn collinear_columns_rejected() {
        let x = array![[1.0, 2.0], [1.0, 2.0], [1.0, 2.0], [1.0, 2.0]];
        let y = array![1.0, 2.0, 3.0, 4.0];
        assert_eq!(ols(&y, &x).unwrap_err(), StatsError::NotPositiveDefinite);
    }
}
