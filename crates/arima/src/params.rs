//! Unconstrained parametrisation of AR and MA polynomials.
//!
//! The optimiser searches over unrestricted reals. Each block is mapped to
//! partial autocorrelations in (-1, 1) with `tanh`, then to polynomial
//! coefficients with the Durbin-Levinson recursion (Jones 1980,
//! Monahan 1984). Every point of the search space therefore maps to a
//! stationary AR polynomial, or an invertible MA polynomial.
//!
//! **Not part of the public API.**

/// Maps unconstrained values to stationary (or invertible) coefficients.
pub(crate) fn to_coefficients(raw: &[f64]) -> Vec<f64> {
    let order = raw.len();
    let mut coeffs = vec![0.0; order];
    if order == 0 {
        return coeffs;
    }

    let pacf: Vec<f64> = raw.iter().map(|x| x.tanh()).collect();
    let mut scratch = vec![0.0; order];

    coeffs[0] = pacf[0];
    for k in 1..order {
        scratch[..k].copy_from_slice(&coeffs[..k]);
        for j in 0..k {
            coeffs[j] = scratch[j] - pacf[k] * scratch[k - 1 - j];
        }
        coeffs[k] = pacf[k];
    }
    coeffs
}

/// Splits a flat optimiser vector into `(ar, ma)` coefficients.
pub(crate) fn split(raw: &[f64], p: usize) -> (Vec<f64>, Vec<f64>) {
    let (alpha, beta) = raw.split_at(p);
    (to_coefficients(alpha), to_coefficients(beta))
}
