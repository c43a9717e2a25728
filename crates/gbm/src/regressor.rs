//! Squared-error gradient boosting.

use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::error::GbmError;
use crate::params::GbmParams;
use crate::tree::{Tree, TreeSettings};

/// An unfitted gradient-boosted regressor.
///
/// ```mermaid
/// graph LR
///     A["GbmRegressor::new(params)"] -->|".fit(x, y)?"| B["GbmModel"]
///     B --> C[".predict(x)?"]
///     B --> D[".score(x, y)?: R²"]
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GbmRegressor {
    params: GbmParams,
}

impl GbmRegressor {
    /// Creates a regressor with the given hyperparameters.
    pub fn new(params: GbmParams) -> Self {
        Self { params }
    }

    /// Returns the hyperparameters.
    pub fn params(&self) -> &GbmParams {
        &self.params
    }

    /// Fits the ensemble to features `x` (rows are samples) and target `y`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`GbmError::InvalidParameter`] | a hyperparameter is out of range |
    /// | [`GbmError::EmptyData`] | no rows or no feature columns |
    /// | [`GbmError::DimensionMismatch`] | `x.nrows() != y.len()` |
    /// | [`GbmError::NonFiniteData`] | NaN or infinity in `x` or `y` |
    pub fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<GbmModel, GbmError> {
        let params = &self.params;
        params.validate()?;
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(GbmError::EmptyData);
        }
        if x.nrows() != y.len() {
            return Err(GbmError::DimensionMismatch {
                rows: x.nrows(),
                len: y.len(),
            });
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(GbmError::NonFiniteData);
        }

        let n = y.len();
        let targets = y.to_vec();
        let base_score = foretune_stats::mean(&targets);
        let mut pred = vec![base_score; n];
        let hess = vec![1.0; n];
        let settings = TreeSettings {
            max_depth: params.max_depth,
            lambda: params.lambda,
            gamma: params.gamma,
            min_child_weight: params.min_child_weight,
            learning_rate: params.learning_rate,
        };
        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let sample_size = ((params.subsample * n as f64).round() as usize).clamp(1, n);

        let mut trees = Vec::with_capacity(params.n_estimators);
        for _ in 0..params.n_estimators {
            let grad: Vec<f64> = pred.iter().zip(&targets).map(|(p, t)| p - t).collect();
            let rows = if sample_size < n {
                let mut rows = rand::seq::index::sample(&mut rng, n, sample_size).into_vec();
                rows.sort_unstable();
                rows
            } else {
                (0..n).collect()
            };

            let tree = Tree::grow(x, &grad, &hess, rows, &settings);
            for (i, p) in pred.iter_mut().enumerate() {
                *p += tree.predict_row(x.row(i));
            }
            trees.push(tree);
        }

        let mse = pred
            .iter()
            .zip(&targets)
            .map(|(p, t)| (p - t).powi(2))
            .sum::<f64>()
            / n as f64;
        debug!(
            n_trees = trees.len(),
            n_rows = n,
            n_features = x.ncols(),
            train_mse = mse,
            "fitted gradient-boosted ensemble"
        );

        Ok(GbmModel {
            base_score,
            trees,
            n_features: x.ncols(),
        })
    }
}

/// A fitted tree ensemble.
#[derive(Clone, Debug, PartialEq)]
pub struct GbmModel {
    base_score: f64,
    trees: Vec<Tree>,
    n_features: usize,
}

impl GbmModel {
    /// Initial prediction (mean of the training target).
    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    /// Number of trees in the ensemble.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of features the model was trained on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Largest depth over all trees.
    pub fn max_tree_depth(&self) -> usize {
        self.trees.iter().map(Tree::depth).max().unwrap_or(0)
    }

    /// Predicts one value per row of `x`.
    ///
    /// # Errors
    ///
    /// [`GbmError::FeatureMismatch`] when `x` has the wrong number of columns.
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, GbmError> {
        if x.ncols() != self.n_features {
            return Err(GbmError::FeatureMismatch {
                expected: self.n_features,
                got: x.ncols(),
            });
        }
        Ok(x.rows()
            .into_iter()
            .map(|row| {
                self.base_score + self.trees.iter().map(|t| t.predict_row(row)).sum::<f64>()
            })
            .collect())
    }

    /// Coefficient of determination R² of the predictions on `(x, y)`.
    ///
    /// A constant target scores 1.0 when predicted exactly, 0.0 otherwise.
    ///
    /// # Errors
    ///
    /// [`GbmError::DimensionMismatch`] when `x` and `y` disagree in length,
    /// [`GbmError::EmptyData`] for an empty `y`, plus anything
    /// [`GbmModel::predict()`] returns.
    pub fn score(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<f64, GbmError> {
        if x.nrows() != y.len() {
            return Err(GbmError::DimensionMismatch {
                rows: x.nrows(),
                len: y.len(),
            });
        }
        if y.is_empty() {
            return Err(GbmError::EmptyData);
        }
        let pred = self.predict(x)?;
        let mean = y.mean().unwrap_or(0.0);
        let ss_res: f64 = pred.iter().zip(y).map(|(p, t)| (t - p).powi(2)).sum();
        let ss_tot: f64 = y.iter().map(|t| (t - mean).powi(2)).sum();
        if ss_tot == 0.0 {
            return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
        }
        Ok(1.0 - ss_res / ss_tot)
    }
}
