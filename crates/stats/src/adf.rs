//! Augmented Dickey-Fuller unit-root test (constant, no trend).
//!
//! Regression:
//!
//! ```text
//! Δy[t] = α + γ·y[t-1] + Σ_{i=1..k} β_i·Δy[t-i] + e[t]
//! ```
//!
//! The lag `k` is chosen by AIC over `0..=max_lag`, every candidate fitted on
//! the same sample. The chosen lag is then refitted on the longest sample it
//! allows and `γ̂ / se(γ̂)` is compared with MacKinnon (2010) approximate
//! critical values.

use ndarray::{Array1, Array2};
use tracing::debug;

use crate::error::StatsError;
use crate::ols::{OlsFit, ols};

/// MacKinnon (2010) response-surface coefficients, constant-only model,
/// one integrated regressor: `b0 + b1/T + b2/T² + b3/T³`.
const MACKINNON_1PCT: [f64; 4] = [-3.43035, -6.5393, -16.786, -79.433];
const MACKINNON_5PCT: [f64; 4] = [-2.86154, -2.8903, -4.234, -40.040];
const MACKINNON_10PCT: [f64; 4] = [-2.56677, -1.5384, -2.809, 0.0];

/// Significance level at which the unit-root null is tested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SignificanceLevel {
    /// 1 %.
    OnePercent,
    /// 5 %.
    #[default]
    FivePercent,
    /// 10 %.
    TenPercent,
}

/// Critical values of the ADF statistic for the sample size used.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CriticalValues {
    /// 1 % critical value.
    pub one_percent: f64,
    /// 5 % critical value.
    pub five_percent: f64,
    /// 10 % critical value.
    pub ten_percent: f64,
}

impl CriticalValues {
    fn for_sample(n_obs: usize) -> Self {
        let t = n_obs as f64;
        let surface = |b: &[f64; 4]| b[0] + b[1] / t + b[2] / (t * t) + b[3] / (t * t * t);
        Self {
            one_percent: surface(&MACKINNON_1PCT),
            five_percent: surface(&MACKINNON_5PCT),
            ten_percent: surface(&MACKINNON_10PCT),
        }
    }

    /// Critical value for `level`.
    pub fn at(&self, level: SignificanceLevel) -> f64 {
        match level {
            SignificanceLevel::OnePercent => self.one_percent,
            SignificanceLevel::FivePercent => self.five_percent,
            SignificanceLevel::TenPercent => self.ten_percent,
        }
    }
}

/// Outcome of [`adf_test`].
#[derive(Clone, Debug)]
pub struct AdfResult {
    statistic: f64,
    used_lag: usize,
    n_obs: usize,
    critical_values: CriticalValues,
}

impl AdfResult {
    /// The ADF t-statistic on the lagged level.
    pub fn statistic(&self) -> f64 {
        self.statistic
    }

    /// Number of lagged differences selected by AIC.
    pub fn used_lag(&self) -> usize {
        self.used_lag
    }

    /// Observations in the final regression.
    pub fn n_obs(&self) -> usize {
        self.n_obs
    }

    /// Critical values for [`AdfResult::n_obs`].
    pub fn critical_values(&self) -> CriticalValues {
        self.critical_values
    }

    /// `true` when the unit-root null is rejected at `level`, i.e. the
    /// series is judged stationary.
    pub fn rejects_unit_root(&self, level: SignificanceLevel) -> bool {
        self.statistic < self.critical_values.at(level)
    }
}

/// Default maximum lag, `ceil(12 · (n/100)^¼)`, capped so the regression
/// keeps enough degrees of freedom.
fn default_max_lag(n: usize) -> usize {
    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    schwert.min((n / 2).saturating_sub(2))
}

/// Builds the ADF regression for lag `k` over `dy[start..]`.
///
/// Columns: constant, lagged level, `k` lagged differences.
fn design(y: &[f64], dy: &[f64], k: usize, start: usize) -> (Array1<f64>, Array2<f64>) {
    let rows = dy.len() - start;
    let mut x = Array2::<f64>::zeros((rows, k + 2));
    let mut target = Array1::<f64>::zeros(rows);
    for (row, t) in (start..dy.len()).enumerate() {
        target[row] = dy[t];
        x[[row, 0]] = 1.0;
        x[[row, 1]] = y[t];
        for i in 1..=k {
            x[[row, 1 + i]] = dy[t - i];
        }
    }
    (target, x)
}

/// Runs the augmented Dickey-Fuller test on `series`.
///
/// `max_lag = None` uses `ceil(12 · (n/100)^¼)`.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`StatsError::EmptyData`] | `series` is empty |
/// | [`StatsError::NonFiniteData`] | any element is NaN or infinite |
/// | [`StatsError::ConstantData`] | all elements are identical |
/// | [`StatsError::InsufficientData`] | too few points for the regression |
/// | [`StatsError::NotPositiveDefinite`] | degenerate regression |
pub fn adf_test(series: &[f64], max_lag: Option<usize>) -> Result<AdfResult, StatsError> {
    const MIN_LEN: usize = 8;

    if series.is_empty() {
        return Err(StatsError::EmptyData);
    }
    if !crate::all_finite(series) {
        return Err(StatsError::NonFiniteData);
    }
    if series.len() < MIN_LEN {
        return Err(StatsError::InsufficientData {
            n: series.len(),
            min: MIN_LEN,
        });
    }
    if crate::is_constant(series) {
        return Err(StatsError::ConstantData);
    }

    let n = series.len();
    let max_lag = max_lag.unwrap_or(usize::MAX).min(default_max_lag(n));
    let dy = crate::difference(series, 1);

    // Lag selection on the common sample dy[max_lag..].
    let mut best: Option<(usize, f64)> = None;
    for k in 0..=max_lag {
        let (target, x) = design(series, &dy, k, max_lag);
        let fit = match ols(&target, &x) {
            Ok(fit) => fit,
            Err(StatsError::NotPositiveDefinite) => continue,
            Err(e) => return Err(e),
        };
        let aic = fit.aic();
        if best.is_none_or(|(_, b)| aic < b) {
            best = Some((k, aic));
        }
    }
    let (used_lag, _) = best.ok_or(StatsError::NotPositiveDefinite)?;

    let (target, x) = design(series, &dy, used_lag, used_lag);
    let fit: OlsFit = ols(&target, &x)?;
    let statistic = fit.t_stat(1).ok_or(StatsError::NotPositiveDefinite)?;
    let critical_values = CriticalValues::for_sample(fit.n_obs());

    debug!(
        statistic,
        used_lag,
        n_obs = fit.n_obs(),
        crit_5pct = critical_values.five_percent,
        "ADF test"
    );

    Ok(AdfResult {
        statistic,
        used_lag,
        n_obs: fit.n_obs(),
        critical_values,
    })
}

/// Returns `true` when the ADF test rejects a unit root at `level`.
pub fn is_stationary(series: &[f64], level: SignificanceLevel) -> Result<bool, StatsError> {
    Ok(adf_test(series, None)?.rejects_unit_root(level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    fn white_noise(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, 1.0).unwrap();
        (0..n).map(|_| normal.sample(&mut rng)).collect()
    }

    fn drifting_walk(n: usize, seed: u64) -> Vec<f64> {
        let mut level = 0.0;
        white_noise(n, seed)
            .into_iter()
            .map(|e| {
                level += 0.5 + e;
                level
            })
            .collect()
    }

    #[test]
    fn critical_values_ordered() {
        let cv = CriticalValues::for_sample(200);
        assert!(cv.one_percent < cv.five_percent);
        assert!(cv.five_percent < cv.ten_percent);
        // Asymptotic 5% value is about -2.86.
        assert!((cv.five_percent + 2.876).abs() < 0.01, "{}", cv.five_percent);
    }

    #[test]
    fn default_max_lag_schwert() {
        assert_eq!(default_max_lag(100), 12);
        assert_eq!(default_max_lag(20), 8);
    }

    #[test]
    fn white_noise_is_stationary() {
        let data = white_noise(300, 7);
        let result = adf_test(&data, None).unwrap();
        assert!(
            result.rejects_unit_root(SignificanceLevel::FivePercent),
            "statistic = {}",
            result.statistic()
        );
    }

    #[test]
    fn drifting_random_walk_is_not_stationary() {
        let data = drifting_walk(300, 11);
        assert!(!is_stationary(&data, SignificanceLevel::FivePercent).unwrap());
    }

    #[test]
    fn fixed_lag_zero() {
        let data = white_noise(120, 3);
        let result = adf_test(&data, Some(0)).unwrap();
        assert_eq!(result.used_lag(), 0);
        assert_eq!(result.n_obs(), 119);
    }

    #[test]
    fn rejects_short_series() {
        assert!(matches!(
            adf_test(&[1.0, 2.0, 3.0], None),
            Err(StatsError::InsufficientData { n: 3, min: 8 })
        ));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(adf_test(&[], None).unwrap_err(), StatsError::EmptyData);
        assert_eq!(
            adf_test(&[1.0; 20], None).unwrap_err(),
            StatsError::ConstantData
        );
        let mut data = white_noise(20, 1);
        data[4] = f64::NAN;
        assert_eq!(adf_test(&data, None).unwrap_err(), StatsError::NonFiniteData);
    }
}
