//! Statistical helper functions for the foretune workspace.
//!
//! Descriptive statistics, differencing, small dense linear algebra,
//! ordinary least squares, and the augmented Dickey-Fuller unit-root test
//! used to pick a differencing order for ARIMA models.

mod adf;
mod error;
pub mod linalg;
mod ols;

pub use adf::{AdfResult, CriticalValues, SignificanceLevel, adf_test, is_stationary};
pub use error::StatsError;
pub use ols::{OlsFit, ols};

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    match data.len() {
        0 => 0.0,
        n => data.iter().sum::<f64>() / n as f64,
    }
}

/// Unbiased sample variance; `0.0` below two observations.
pub fn variance(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let centre = mean(data);
    let ss: f64 = data.iter().map(|x| (x - centre).powi(2)).sum();
    ss / (data.len() - 1) as f64
}

/// Sample standard deviation, the square root of [`variance()`].
pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Applies first-order differencing `order` times.
///
/// Each pass shortens the series by one, so the result has
/// `data.len().saturating_sub(order)` elements.
///
/// ```
/// let d = foretune_stats::difference(&[1.0, 4.0, 9.0, 16.0], 2);
/// assert_eq!(d, vec![2.0, 2.0]);
/// ```
pub fn difference(data: &[f64], order: usize) -> Vec<f64> {
    let mut out = data.to_vec();
    for _ in 0..order {
        if out.len() < 2 {
            return Vec::new();
        }
        out = out.windows(2).map(|w| w[1] - w[0]).collect();
    }
    out
}

/// Returns `true` when every element of `data` is finite.
pub fn all_finite(data: &[f64]) -> bool {
    data.iter().all(|x| x.is_finite())
}

/// Returns `true` when `data` has no spread (max == min within machine epsilon).
pub fn is_constant(data: &[f64]) -> bool {
    let min_val = data.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_val = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    (max_val - min_val).abs() < f64::EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn moments_of_small_sample() {
        let data = [1.0, 3.0, 8.0];
        assert_relative_eq!(mean(&data), 4.0);
        // Deviations -3, -1, 4: 26 / 2.
        assert_relative_eq!(variance(&data), 13.0);
        assert_relative_eq!(sd(&data), 13.0_f64.sqrt());
    }

    #[test]
    fn degenerate_samples_give_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(variance(&[2.5]), 0.0);
        assert_eq!(sd(&[]), 0.0);
    }

    #[test]
    fn test_difference_zero_order_is_identity() {
        assert_eq!(difference(&[1.0, 2.0, 4.0], 0), vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn test_difference_first_order() {
        assert_eq!(difference(&[1.0, 2.0, 4.0, 7.0], 1), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_difference_exhausts_short_series() {
        assert!(difference(&[1.0, 2.0], 3).is_empty());
        assert!(difference(&[], 1).is_empty());
    }

    #[test]
    fn test_all_finite() {
        assert!(all_finite(&[1.0, -2.0]));
        assert!(!all_finite(&[1.0, f64::NAN]));
        assert!(!all_finite(&[f64::NEG_INFINITY]));
    }

    #[test]
    fn test_is_constant() {
        assert!(is_constant(&[3.0, 3.0, 3.0]));
        assert!(!is_constant(&[3.0, 3.5]));
    }
}
