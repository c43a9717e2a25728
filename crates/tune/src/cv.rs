//! K-fold cross-validation.

use std::ops::Range;

use foretune_gbm::GbmRegressor;
use ndarray::{ArrayView1, ArrayView2, Axis};

use crate::error::TuneError;

/// Contiguous, unshuffled k-fold splitter.
///
/// The first `n % k` folds hold one extra row, so fold sizes differ by at
/// most one. Each fold is tested once, trained on the complement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KFold {
    folds: usize,
}

/// One train/test split: `test` is a row range, `train` is everything else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Split {
    /// Row indices used for fitting.
    pub train: Vec<usize>,
    /// Row range used for scoring.
    pub test: Range<usize>,
}

impl KFold {
    /// Creates a splitter with `folds` folds.
    ///
    /// # Errors
    ///
    /// [`TuneError::Validation`] when `folds < 2`.
    pub fn new(folds: usize) -> Result<Self, TuneError> {
        if folds < 2 {
            return Err(TuneError::Validation(format!(
                "cross-validation needs at least 2 folds, got {folds}"
            )));
        }
        Ok(Self { folds })
    }

    /// Number of folds.
    pub fn folds(&self) -> usize {
        self.folds
    }

    /// Splits `n` rows.
    ///
    /// # Errors
    ///
    /// [`TuneError::Validation`] when `n` is smaller than the fold count.
    pub fn splits(&self, n: usize) -> Result<Vec<Split>, TuneError> {
        if n < self.folds {
            return Err(TuneError::Validation(format!(
                "cannot split {n} rows into {} folds",
                self.folds
            )));
        }
        let base = n / self.folds;
        let extra = n % self.folds;

        let mut start = 0;
        let mut out = Vec::with_capacity(self.folds);
        for i in 0..self.folds {
            let end = start + base + usize::from(i < extra);
            let train = (0..start).chain(end..n).collect();
            out.push(Split {
                train,
                test: start..end,
            });
            start = end;
        }
        Ok(out)
    }
}

/// Mean held-out R² of `regressor` over the folds of `splitter`.
///
/// # Errors
///
/// Splitting errors, and any [`foretune_gbm::GbmError`] from fitting or
/// scoring a fold.
pub fn cross_val_score(
    regressor: &GbmRegressor,
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
    splitter: &KFold,
) -> Result<f64, TuneError> {
    let splits = splitter.splits(y.len())?;
    let mut total = 0.0;
    for split in &splits {
        let test: Vec<usize> = split.test.clone().collect();
        let model = regressor.fit(
            x.select(Axis(0), &split.train).view(),
            y.select(Axis(0), &split.train).view(),
        )?;
        total += model.score(
            x.select(Axis(0), &test).view(),
            y.select(Axis(0), &test).view(),
        )?;
    }
    Ok(total / splits.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use foretune_gbm::GbmParams;
    use ndarray::{Array1, Array2};

    #[test]
    fn rejects_single_fold() {
        assert!(matches!(KFold::new(1), Err(TuneError::Validation(_))));
    }

    #[test]
    fn uneven_folds_front_loaded() {
        let splits = KFold::new(3).unwrap().splits(10).unwrap();
        let sizes: Vec<usize> = splits.iter().map(|s| s.test.len()).collect();
        assert_eq!(sizes, [4, 3, 3]);
        assert_eq!(splits[1].test, 4..7);
        assert_eq!(splits[1].train, [0, 1, 2, 3, 7, 8, 9]);
    }

    #[test]
    fn folds_partition_rows() {
        let splits = KFold::new(5).unwrap().splits(23).unwrap();
        let mut seen: Vec<usize> = splits.iter().flat_map(|s| s.test.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..23).collect::<Vec<_>>());
        for s in &splits {
            assert_eq!(s.train.len() + s.test.len(), 23);
        }
    }

    #[test]
    fn too_few_rows() {
        let err = KFold::new(5).unwrap().splits(4).unwrap_err();
        assert!(matches!(err, TuneError::Validation(_)));
    }

    #[test]
    fn cross_val_score_on_smooth_target() {
        // Interleave rows so every fold covers the whole input range.
        let n = 60;
        let x = Array2::from_shape_fn((n, 1), |(i, _)| ((i * 7) % n) as f64);
        let y: Array1<f64> = x.column(0).mapv(|v| v * 0.5);
        let reg = GbmRegressor::new(GbmParams::default().with_n_estimators(30).with_seed(Some(0)));
        let score = cross_val_score(&reg, x.view(), y.view(), &KFold::new(3).unwrap()).unwrap();
        assert!(score > 0.9, "mean R² = {score}");
    }
}
