//! Pure conversion functions: TOML config structs -> crate API types.

use anyhow::{Context, Result};

use foretune_tune::{ArimaTuner, BayesSearchConfig, Criterion, HyperparameterSpace};

use crate::config::{ArimaToml, BoostToml};

/// Parses a scoring method name.
pub fn parse_method(s: &str) -> Result<Criterion> {
    s.parse::<Criterion>()
        .with_context(|| format!("invalid [arima].method {s:?}"))
}

/// Builds an [`ArimaTuner`] from the TOML ARIMA section.
pub fn build_arima_tuner(cfg: &ArimaToml) -> ArimaTuner {
    ArimaTuner::new()
        .strict(cfg.strict)
        .with_max_d(cfg.max_d)
}

/// Builds the `p`/`q`/`d` search space.
pub fn build_arima_space(p: &[usize], q: &[usize], d: &[usize]) -> Result<HyperparameterSpace> {
    HyperparameterSpace::arima(p, q, d).context("invalid ARIMA search space")
}

/// Builds a [`BayesSearchConfig`] from the TOML boost section.
pub fn build_bayes_config(cfg: &BoostToml) -> BayesSearchConfig {
    BayesSearchConfig::default()
        .with_n_iter(cfg.n_iter)
        .with_cv_folds(cfg.cv_folds)
        .with_n_initial_points(cfg.n_initial_points)
        .with_n_candidates(cfg.n_candidates)
        .with_xi(cfg.xi)
        .with_seed(cfg.seed)
        .with_verbose(cfg.verbose)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names_are_exact() {
        assert_eq!(parse_method("bic").unwrap(), Criterion::Bic);
        for name in ["mse", "BIC"] {
            let err = parse_method(name).unwrap_err();
            assert!(format!("{err:#}").contains("unknown scoring method"));
        }
    }

    #[test]
    fn empty_order_list_is_rejected() {
        let err = build_arima_space(&[], &[0], &[0]).unwrap_err();
        assert!(format!("{err:#}").contains("\"p\" is empty"));
    }

    #[test]
    fn bayes_config_carries_every_field() {
        let toml = BoostToml {
            n_iter: 7,
            cv_folds: 3,
            n_initial_points: 2,
            n_candidates: 64,
            xi: 0.1,
            seed: Some(9),
            verbose: false,
        };
        let cfg = build_bayes_config(&toml);
        assert_eq!(cfg.n_iter, 7);
        assert_eq!(cfg.cv_folds, 3);
        assert_eq!(cfg.n_initial_points, 2);
        assert_eq!(cfg.n_candidates, 64);
        assert_eq!(cfg.seed, Some(9));
        assert!(!cfg.verbose);
        assert_eq!(cfg.xi, 0.1);
    }
}
