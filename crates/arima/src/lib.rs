//! # foretune-arima
//!
//! ARIMA(p, q, d) model fitting via state-space maximum likelihood
//! (Kalman filter), with the information criteria and standard errors
//! used to rank candidate orders.
//!
//! ## Typestate Workflow
//!
//! ```mermaid
//! graph LR
//!     A["ArimaSpec::new(p, q, d)"] -->|".fit(&data)?"| B["ArimaFit"]
//!     B --> C[".aic() / .bic()"]
//!     B --> D[".bse()?: standard errors"]
//!     B --> E[".forecast(h)"]
//!     F["ArimaEstimator::new(&train, order)"] -->|".fit()?"| B
//! ```
//!
//! ## Mathematical Glossary
//!
//! | Symbol | Accessor | Meaning |
//! |--------|----------|---------|
//! | phi | [`ArimaFit::ar()`] | AR coefficients: weights on past observations |
//! | theta | [`ArimaFit::ma()`] | MA coefficients: weights on past forecast errors |
//! | sigma2 | [`ArimaFit::sigma2()`] | Innovation (white-noise) variance |
//! | mu | [`ArimaFit::intercept()`] | Series mean, estimated only when `d == 0` |
//! | AIC | [`ArimaFit::aic()`] | `2k - 2·loglik` (lower = better) |
//! | BIC | [`ArimaFit::bic()`] | `k·ln(n - d) - 2·loglik` (lower = better) |

mod error;
mod estimator;
mod fit;
mod spec;

pub(crate) mod hessian;
pub(crate) mod kalman;
pub(crate) mod optimizer;
pub(crate) mod params;
pub(crate) mod state_space;

pub use error::ArimaError;
pub use estimator::ArimaEstimator;
pub use fit::ArimaFit;
pub use spec::{ArimaOrder, ArimaSpec};
