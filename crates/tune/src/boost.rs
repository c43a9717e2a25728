//! Bayesian tuning of the gradient-boosted regressor.

use foretune_gbm::{GbmError, GbmModel, GbmParams, GbmRegressor};
use ndarray::{ArrayView1, ArrayView2};
use tracing::info;

use crate::bayes::{self, BayesOptimizer, BayesSearch, BayesSearchConfig};
use crate::cv::{self, KFold};
use crate::error::TuneError;
use crate::space::{Domain, HyperparameterSpace, ParamSet, ParamValue};
use crate::traits::BayesianOptimisation;

/// Tunes [`GbmRegressor`] hyperparameters by Bayesian optimisation of the
/// mean k-fold R².
///
/// The default space covers `n_estimators` in \[100, 1000\], `max_depth` in
/// \[3, 13\], `learning_rate` in \[0.01, 1\], `gamma` in \[0, 5\] and
/// `subsample` in \[0.5, 1\].
#[derive(Clone, Debug)]
pub struct GradientBoostTuner {
    config: BayesSearchConfig,
    space: HyperparameterSpace,
}

impl Default for GradientBoostTuner {
    fn default() -> Self {
        Self::new(BayesSearchConfig::default())
    }
}

impl GradientBoostTuner {
    /// Creates a tuner over the default space.
    pub fn new(config: BayesSearchConfig) -> Self {
        Self {
            config,
            space: Self::default_space(),
        }
    }

    /// Replaces the search space.
    pub fn with_space(mut self, space: HyperparameterSpace) -> Self {
        self.space = space;
        self
    }

    /// The fixed default search space.
    pub fn default_space() -> HyperparameterSpace {
        HyperparameterSpace::from_trusted(vec![
            ("n_estimators".into(), Domain::Integer { low: 100, high: 1000 }),
            ("max_depth".into(), Domain::Integer { low: 3, high: 13 }),
            ("learning_rate".into(), Domain::Real { low: 0.01, high: 1.0 }),
            ("gamma".into(), Domain::Real { low: 0.0, high: 5.0 }),
            ("subsample".into(), Domain::Real { low: 0.5, high: 1.0 }),
        ])
    }

    /// Search settings.
    pub fn config(&self) -> &BayesSearchConfig {
        &self.config
    }

    /// Search space.
    pub fn space(&self) -> &HyperparameterSpace {
        &self.space
    }
}

impl BayesianOptimisation for GradientBoostTuner {
    type Output = BayesSearch<GbmModel>;

    /// Runs the search and refits the best parameters on all of `x, y`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`TuneError::Validation`] | shape mismatch, fewer rows than folds, bad settings |
    /// | [`TuneError::Gbm`] | non-finite data, or a fit fails |
    /// | [`TuneError::MalformedSpace`] | the space names an unknown parameter |
    #[tracing::instrument(skip_all, fields(n_rows = x.nrows(), n_iter = self.config.n_iter))]
    fn bayesian_optimisation(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Self::Output, TuneError> {
        if x.nrows() != y.len() {
            return Err(TuneError::Validation(format!(
                "feature matrix has {} rows but target has {} values",
                x.nrows(),
                y.len()
            )));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(GbmError::NonFiniteData.into());
        }
        let folds = KFold::new(self.config.cv_folds)?;
        folds.splits(y.len())?;

        let seed = self.config.seed;
        let trials = BayesOptimizer::new(&self.space, &self.config).maximize(|params| {
            let regressor = GbmRegressor::new(gbm_params(params, seed)?);
            cv::cross_val_score(&regressor, x, y, &folds)
        })?;

        let best = bayes::best_trial(&trials).ok_or_else(|| {
            TuneError::Validation("no trial produced a finite score".into())
        })?;
        let model = GbmRegressor::new(gbm_params(&best.params, seed)?).fit(x, y)?;
        info!(
            best_score = best.score,
            best_iteration = best.iteration,
            params = ?best.params,
            "bayesian search finished"
        );

        let best = best.clone();
        Ok(BayesSearch::new(&best, model, trials))
    }
}

/// Maps search parameters by name onto [`GbmParams`]; names absent from
/// `params` keep their defaults.
///
/// # Errors
///
/// [`TuneError::MalformedSpace`] for an unknown name or a value of the
/// wrong kind.
pub fn gbm_params(params: &ParamSet, seed: Option<u64>) -> Result<GbmParams, TuneError> {
    let count = |name: &str, value: &ParamValue| -> Result<usize, TuneError> {
        value
            .as_i64()
            .and_then(|v| usize::try_from(v).ok())
            .ok_or_else(|| {
                TuneError::MalformedSpace(format!(
                    "{name} must be a non-negative integer, got {value}"
                ))
            })
    };

    let mut out = GbmParams::default().with_seed(seed);
    for (name, value) in params {
        match name.as_str() {
            "n_estimators" => out.n_estimators = count(name, value)?,
            "max_depth" => out.max_depth = count(name, value)?,
            "learning_rate" => out.learning_rate = value.as_f64(),
            "gamma" => out.gamma = value.as_f64(),
            "subsample" => out.subsample = value.as_f64(),
            "lambda" => out.lambda = value.as_f64(),
            "min_child_weight" => out.min_child_weight = value.as_f64(),
            other => {
                return Err(TuneError::MalformedSpace(format!(
                    "unknown boosting parameter {other:?}"
                )));
            }
        }
    }
    Ok(out)
}
