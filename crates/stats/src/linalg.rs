//! Dense linear algebra for the small symmetric systems used across the
//! workspace: normal equations, Hessian inversion, and Gaussian-process
//! kernel solves.
//!
//! All routines work on `ndarray` containers and go through a Cholesky
//! factorisation, so inputs must be symmetric positive definite.

use ndarray::{Array1, Array2};

use crate::error::StatsError;

/// Lower-triangular Cholesky factor `L` with `A = L·Lᵀ`.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`StatsError::DimensionMismatch`] | `a` is not square |
/// | [`StatsError::NotPositiveDefinite`] | a pivot is non-positive or non-finite |
pub fn cholesky(a: &Array2<f64>) -> Result<Array2<f64>, StatsError> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(StatsError::DimensionMismatch {
            rows: n,
            len: a.ncols(),
        });
    }

    let mut l = Array2::<f64>::zeros((n, n));
    for j in 0..n {
        let mut diag = a[[j, j]];
        for k in 0..j {
            diag -= l[[j, k]] * l[[j, k]];
        }
        if !diag.is_finite() || diag <= 0.0 {
            return Err(StatsError::NotPositiveDefinite);
        }
        let ljj = diag.sqrt();
        l[[j, j]] = ljj;

        for i in (j + 1)..n {
            let mut sum = a[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = sum / ljj;
        }
    }
    Ok(l)
}

/// Solves `L·Lᵀ·x = b` given the Cholesky factor `L`.
///
/// # Errors
///
/// [`StatsError::DimensionMismatch`] when `b.len() != L.nrows()`.
pub fn cholesky_solve(l: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, StatsError> {
    let n = l.nrows();
    if b.len() != n {
        return Err(StatsError::DimensionMismatch {
            rows: n,
            len: b.len(),
        });
    }

    // Forward substitution: L z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[[i, k]] * z[k];
        }
        z[i] = sum / l[[i, i]];
    }

    // Back substitution: Lᵀ x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = z[i];
        for k in (i + 1)..n {
            sum -= l[[k, i]] * x[k];
        }
        x[i] = sum / l[[i, i]];
    }
    Ok(x)
}

/// Solves `L·z = b` (forward substitution only).
///
/// Used for predictive variances, where only `‖L⁻¹k‖²` is needed.
pub fn forward_solve(l: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, StatsError> {
    let n = l.nrows();
    if b.len() != n {
        return Err(StatsError::DimensionMismatch {
            rows: n,
            len: b.len(),
        });
    }
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[[i, k]] * z[k];
        }
        z[i] = sum / l[[i, i]];
    }
    Ok(z)
}

/// Inverse of a symmetric positive definite matrix.
pub fn invert_spd(a: &Array2<f64>) -> Result<Array2<f64>, StatsError> {
    let l = cholesky(a)?;
    let n = a.nrows();
    let mut inv = Array2::<f64>::zeros((n, n));
    for j in 0..n {
        let mut e = Array1::<f64>::zeros(n);
        e[j] = 1.0;
        let col = cholesky_solve(&l, &e)?;
        inv.column_mut(j).assign(&col);
    }
    Ok(inv)
}

/// `log|A|` from the Cholesky factor of `A`.
pub fn log_det_cholesky(l: &Array2<f64>) -> f64 {
    2.0 * l.diag().iter().map(|d| d.ln()).sum::<f64>()
}
