//! # foretune-tune
//!
//! Hyperparameter tuners for forecasting models.
//!
//! | Tuner | Capability | Strategy |
//! |-------|------------|----------|
//! | [`GradientBoostTuner`] | [`BayesianOptimisation`] | GP surrogate + expected improvement over k-fold R² |
//! | [`ArimaTuner`] | [`GridSearch`] | exhaustive `(p, q, d)` grid ranked by AIC, BIC or BSE |
//! | [`GarchTuner`] | [`GridSearch`] | declared only; always [`TuneError::Unimplemented`] |
//!
//! ```no_run
//! use foretune_tune::{ArimaTuner, GridSearch, HyperparameterSpace};
//!
//! # fn main() -> Result<(), foretune_tune::TuneError> {
//! let series: Vec<f64> = (0..200).map(|t| (t as f64 * 0.3).sin()).collect();
//! let space = HyperparameterSpace::arima(&[0, 1, 2], &[0, 1], &[0])?;
//! let (order, estimator) = ArimaTuner::new().grid_search(&space, "aic", &series)?;
//! let fit = estimator.fit()?;
//! println!("best {order}: aic = {}", fit.aic());
//! # Ok(())
//! # }
//! ```

mod arima_tuner;
mod bayes;
mod boost;
mod criterion;
mod cv;
mod error;
mod garch;
mod space;
mod traits;

pub(crate) mod gp;

pub use arima_tuner::{ArimaTuner, DEFAULT_MAX_D, GridSearchReport, ScoreRecord};
pub use bayes::{BayesOptimizer, BayesSearch, BayesSearchConfig, Trial};
pub use boost::{GradientBoostTuner, gbm_params};
pub use criterion::Criterion;
pub use cv::{KFold, Split, cross_val_score};
pub use error::TuneError;
pub use garch::{GarchOrder, GarchTuner};
pub use space::{Domain, HyperparameterSpace, ParamSet, ParamValue, SpaceError};
pub use traits::{BayesianOptimisation, GridSearch};
