//! # foretune-gbm
//!
//! Gradient-boosted regression trees with squared-error loss, in the
//! second-order formulation popularised by XGBoost: each round grows a tree
//! on the gradients of the current ensemble, splits by exact greedy search
//! on the regularised gain, and adds shrunken leaf weights.
//!
//! ```
//! use foretune_gbm::{GbmParams, GbmRegressor};
//! use ndarray::{Array1, Array2};
//!
//! let x = Array2::from_shape_fn((20, 1), |(i, _)| i as f64);
//! let y: Array1<f64> = x.column(0).mapv(|v| v * v);
//! let params = GbmParams::default().with_n_estimators(20).with_seed(Some(0));
//! let model = GbmRegressor::new(params).fit(x.view(), y.view()).unwrap();
//! assert!(model.score(x.view(), y.view()).unwrap() > 0.9);
//! ```

mod error;
mod params;
mod regressor;

pub(crate) mod tree;

pub use error::GbmError;
pub use params::GbmParams;
pub use regressor::{GbmModel, GbmRegressor};
