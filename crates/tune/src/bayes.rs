//! Sequential model-based (Bayesian) search.
//!
//! ```mermaid
//! graph LR
//!     A["n_initial_points random draws"] --> B["fit GP on (unit coords, -score)"]
//!     B --> C["argmax EI over n_candidates random points"]
//!     C --> D["evaluate objective"]
//!     D --> B
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::TuneError;
use crate::gp::{self, GaussianProcess};
use crate::space::{HyperparameterSpace, ParamSet};

/// Settings of a Bayesian search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BayesSearchConfig {
    /// Objective evaluations.
    pub n_iter: usize,
    /// Cross-validation folds per evaluation.
    pub cv_folds: usize,
    /// Random evaluations before the surrogate takes over.
    pub n_initial_points: usize,
    /// Random candidates scored by the acquisition function per step.
    pub n_candidates: usize,
    /// Exploration margin of expected improvement.
    pub xi: f64,
    /// Seed for sampling and model fitting; `None` draws from the OS.
    pub seed: Option<u64>,
    /// Log each iteration at `info` instead of `debug`.
    pub verbose: bool,
}

impl Default for BayesSearchConfig {
    fn default() -> Self {
        Self {
            n_iter: 50,
            cv_folds: 5,
            n_initial_points: 10,
            n_candidates: 1000,
            xi: 0.01,
            seed: None,
            verbose: true,
        }
    }
}

impl BayesSearchConfig {
    /// Sets the number of evaluations.
    pub fn with_n_iter(mut self, n_iter: usize) -> Self {
        self.n_iter = n_iter;
        self
    }

    /// Sets the number of cross-validation folds.
    pub fn with_cv_folds(mut self, folds: usize) -> Self {
        self.cv_folds = folds;
        self
    }

    /// Sets the number of random warm-up evaluations.
    pub fn with_n_initial_points(mut self, n: usize) -> Self {
        self.n_initial_points = n;
        self
    }

    /// Sets the number of acquisition candidates per step.
    pub fn with_n_candidates(mut self, n: usize) -> Self {
        self.n_candidates = n;
        self
    }

    /// Sets the expected-improvement exploration margin.
    pub fn with_xi(mut self, xi: f64) -> Self {
        self.xi = xi;
        self
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the progress log level.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn validate(&self) -> Result<(), TuneError> {
        if self.n_iter == 0 {
            return Err(TuneError::Validation("n_iter must be at least 1".into()));
        }
        if self.n_candidates == 0 {
            return Err(TuneError::Validation(
                "n_candidates must be at least 1".into(),
            ));
        }
        if !(self.xi.is_finite() && self.xi >= 0.0) {
            return Err(TuneError::Validation(format!(
                "xi must be non-negative, got {}",
                self.xi
            )));
        }
        Ok(())
    }
}

/// One evaluated point of a search.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trial {
    /// Zero-based evaluation index.
    pub iteration: usize,
    /// Evaluated parameters.
    pub params: ParamSet,
    /// Objective value (higher is better).
    pub score: f64,
}

/// Outcome of a finished search: the best point, the estimator refit on
/// all data with it, and every trial.
#[derive(Clone, Debug)]
pub struct BayesSearch<M> {
    best_params: ParamSet,
    best_score: f64,
    best_estimator: M,
    trials: Vec<Trial>,
}

impl<M> BayesSearch<M> {
    pub(crate) fn new(best: &Trial, best_estimator: M, trials: Vec<Trial>) -> Self {
        Self {
            best_params: best.params.clone(),
            best_score: best.score,
            best_estimator,
            trials,
        }
    }

    /// Parameters of the best trial.
    pub fn best_params(&self) -> &ParamSet {
        &self.best_params
    }

    /// Score of the best trial.
    pub fn best_score(&self) -> f64 {
        self.best_score
    }

    /// Estimator refit on the full data with [`BayesSearch::best_params()`].
    pub fn best_estimator(&self) -> &M {
        &self.best_estimator
    }

    /// Every trial in evaluation order.
    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }
}

/// Best trial: highest finite score, earliest on ties.
pub(crate) fn best_trial(trials: &[Trial]) -> Option<&Trial> {
    trials
        .iter()
        .filter(|t| t.score.is_finite())
        .fold(None, |best: Option<&Trial>, t| match best {
            Some(b) if b.score >= t.score => Some(b),
            _ => Some(t),
        })
}

/// Gaussian-process optimiser over a [`HyperparameterSpace`].
#[derive(Clone, Debug)]
pub struct BayesOptimizer<'a> {
    space: &'a HyperparameterSpace,
    config: &'a BayesSearchConfig,
}

impl<'a> BayesOptimizer<'a> {
    /// Binds a space and settings.
    pub fn new(space: &'a HyperparameterSpace, config: &'a BayesSearchConfig) -> Self {
        Self { space, config }
    }

    /// Evaluates `objective` `n_iter` times and returns every trial.
    ///
    /// # Errors
    ///
    /// [`TuneError::Validation`] for an unusable configuration or empty
    /// space; the first error returned by `objective` aborts the search.
    pub fn maximize<F>(&self, mut objective: F) -> Result<Vec<Trial>, TuneError>
    where
        F: FnMut(&ParamSet) -> Result<f64, TuneError>,
    {
        self.config.validate()?;
        if self.space.is_empty() {
            return Err(TuneError::Validation("search space is empty".into()));
        }
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut trials: Vec<Trial> = Vec::with_capacity(self.config.n_iter);
        for iteration in 0..self.config.n_iter {
            let params = if iteration < self.config.n_initial_points {
                self.space.sample(&mut rng)
            } else {
                self.propose(&trials, &mut rng)?
            };

            let score = objective(&params)?;
            trials.push(Trial {
                iteration,
                params,
                score,
            });

            let best = best_trial(&trials).map_or(f64::NAN, |t| t.score);
            let params = &trials[iteration].params;
            if self.config.verbose {
                info!(iteration, score, best, ?params, "bayesian search step");
            } else {
                debug!(iteration, score, best, ?params, "bayesian search step");
            }
        }
        Ok(trials)
    }

    /// Next point: maximum expected improvement among candidates drawn
    /// uniformly in unit coordinates and snapped onto the space.
    /// Falls back to a random draw when the surrogate cannot be fitted.
    fn propose(&self, trials: &[Trial], rng: &mut StdRng) -> Result<ParamSet, TuneError> {
        let observed: Vec<&Trial> = trials.iter().filter(|t| t.score.is_finite()).collect();
        if observed.len() < 2 {
            return Ok(self.space.sample(rng));
        }
        let points = observed
            .iter()
            .map(|t| self.space.to_unit(&t.params))
            .collect::<Result<Vec<_>, _>>()?;
        let losses: Vec<f64> = observed.iter().map(|t| -t.score).collect();
        let incumbent = losses.iter().copied().fold(f64::INFINITY, f64::min);

        let gp = match GaussianProcess::fit(&points, &losses) {
            Ok(gp) => gp,
            Err(err) => {
                debug!(%err, "surrogate fit failed, sampling at random");
                return Ok(self.space.sample(rng));
            }
        };

        let mut best: Option<(f64, ParamSet)> = None;
        for _ in 0..self.config.n_candidates {
            let unit: Vec<f64> = (0..self.space.len()).map(|_| rng.random()).collect();
            let candidate = self.space.from_unit(&unit);
            if trials.iter().any(|t| t.params == candidate) {
                continue;
            }
            let (mean, sd) = gp.predict(&self.space.to_unit(&candidate)?)?;
            let ei = gp::expected_improvement(mean, sd, incumbent, self.config.xi);
            if best.as_ref().is_none_or(|(b, _)| ei > *b) {
                best = Some((ei, candidate));
            }
        }
        Ok(match best {
            Some((_, params)) => params,
            None => self.space.sample(rng),
        })
    }
}
