//! Boosting hyperparameters.

use serde::{Deserialize, Serialize};

use crate::error::GbmError;

/// Hyperparameters of a [`GbmRegressor`](crate::GbmRegressor).
///
/// Defaults follow the usual XGBoost settings for squared-error regression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GbmParams {
    /// Number of boosting rounds (trees).
    pub n_estimators: usize,
    /// Maximum depth of each tree; a depth-0 tree is a single leaf.
    pub max_depth: usize,
    /// Shrinkage applied to every leaf weight.
    pub learning_rate: f64,
    /// Minimum loss reduction required to make a split.
    pub gamma: f64,
    /// Fraction of rows sampled (without replacement) for each tree.
    pub subsample: f64,
    /// L2 penalty on leaf weights.
    pub lambda: f64,
    /// Minimum sum of hessians in a child.
    pub min_child_weight: f64,
    /// Seed for row subsampling; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for GbmParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 6,
            learning_rate: 0.3,
            gamma: 0.0,
            subsample: 1.0,
            lambda: 1.0,
            min_child_weight: 1.0,
            seed: None,
        }
    }
}

impl GbmParams {
    /// Sets the number of boosting rounds.
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    /// Sets the maximum tree depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the learning rate.
    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Sets the minimum split gain.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets the row subsampling ratio.
    pub fn with_subsample(mut self, ratio: f64) -> Self {
        self.subsample = ratio;
        self
    }

    /// Sets the L2 leaf penalty.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Checks every parameter against its valid range.
    ///
    /// # Errors
    ///
    /// [`GbmError::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<(), GbmError> {
        let invalid = |name: &'static str, reason: String| {
            Err(GbmError::InvalidParameter { name, reason })
        };

        if self.n_estimators == 0 {
            return invalid("n_estimators", "must be at least 1".into());
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return invalid(
                "learning_rate",
                format!("must be positive, got {}", self.learning_rate),
            );
        }
        if !(self.gamma.is_finite() && self.gamma >= 0.0) {
            return invalid("gamma", format!("must be non-negative, got {}", self.gamma));
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return invalid(
                "subsample",
                format!("must be in (0, 1], got {}", self.subsample),
            );
        }
        if !(self.lambda.is_finite() && self.lambda >= 0.0) {
            return invalid("lambda", format!("must be non-negative, got {}", self.lambda));
        }
        if !(self.min_child_weight.is_finite() && self.min_child_weight >= 0.0) {
            return invalid(
                "min_child_weight",
                format!("must be non-negative, got {}", self.min_child_weight),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GbmParams::default().validate().is_ok());
    }

    #[test]
    fn builder_sets_fields() {
        let p = GbmParams::default()
            .with_n_estimators(10)
            .with_max_depth(2)
            .with_learning_rate(0.1)
            .with_gamma(0.5)
            .with_subsample(0.8)
            .with_lambda(2.0)
            .with_seed(Some(3));
        assert_eq!(p.n_estimators, 10);
        assert_eq!(p.max_depth, 2);
        assert_eq!(p.gamma, 0.5);
        assert_eq!(p.subsample, 0.8);
        assert_eq!(p.lambda, 2.0);
        assert_eq!(p.seed, Some(3));
    }

    #[test]
    fn zero_estimators_rejected() {
        let err = GbmParams::default().with_n_estimators(0).validate().unwrap_err();
        assert!(matches!(err, GbmError::InvalidParameter { name: "n_estimators", .. }));
    }

    #[test]
    fn subsample_bounds() {
        for bad in [0.0, -0.1, 1.5, f64::NAN] {
            let err = GbmParams::default().with_subsample(bad).validate().unwrap_err();
            assert!(matches!(err, GbmError::InvalidParameter { name: "subsample", .. }));
        }
        assert!(GbmParams::default().with_subsample(1.0).validate().is_ok());
    }

    #[test]
    fn negative_gamma_rejected() {
        let err = GbmParams::default().with_gamma(-1.0).validate().unwrap_err();
        assert!(matches!(err, GbmError::InvalidParameter { name: "gamma", .. }));
    }

    #[test]
    fn serde_round_trip() {
        let p = GbmParams::default().with_seed(Some(9));
        let json = serde_json::to_string(&p).unwrap();
        let back: GbmParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
