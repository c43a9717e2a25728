use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level foretune configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForetuneConfig {
    /// I/O settings.
    #[serde(default)]
    pub io: IoConfig,

    /// ARIMA grid search settings.
    #[serde(default)]
    pub arima: ArimaToml,

    /// Gradient-boosting search settings.
    #[serde(default)]
    pub boost: BoostToml,
}

impl ForetuneConfig {
    /// Reads and parses a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&text).context("failed to parse TOML config")
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoConfig {
    pub input: Option<PathBuf>,
    #[serde(default = "default_column")]
    pub column: String,
    #[serde(default = "default_target")]
    pub target: String,
    pub output: Option<PathBuf>,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            input: None,
            column: default_column(),
            target: default_target(),
            output: None,
        }
    }
}

fn default_column() -> String {
    "value".to_string()
}
fn default_target() -> String {
    "y".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArimaToml {
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default = "default_orders")]
    pub p: Vec<usize>,
    #[serde(default = "default_orders")]
    pub q: Vec<usize>,
    /// Candidate differencing orders; found by the ADF test when absent.
    #[serde(default)]
    pub d: Option<Vec<usize>>,
    #[serde(default)]
    pub strict: bool,
    #[serde(default = "default_max_d")]
    pub max_d: usize,
}

impl Default for ArimaToml {
    fn default() -> Self {
        Self {
            method: default_method(),
            p: default_orders(),
            q: default_orders(),
            d: None,
            strict: false,
            max_d: default_max_d(),
        }
    }
}

fn default_method() -> String {
    "aic".to_string()
}
fn default_orders() -> Vec<usize> {
    vec![0, 1, 2]
}
fn default_max_d() -> usize {
    foretune_tune::DEFAULT_MAX_D
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoostToml {
    #[serde(default = "default_n_iter")]
    pub n_iter: usize,
    #[serde(default = "default_cv_folds")]
    pub cv_folds: usize,
    #[serde(default = "default_n_initial_points")]
    pub n_initial_points: usize,
    #[serde(default = "default_n_candidates")]
    pub n_candidates: usize,
    #[serde(default = "default_xi")]
    pub xi: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_true")]
    pub verbose: bool,
}

impl Default for BoostToml {
    fn default() -> Self {
        Self {
            n_iter: default_n_iter(),
            cv_folds: default_cv_folds(),
            n_initial_points: default_n_initial_points(),
            n_candidates: default_n_candidates(),
            xi: default_xi(),
            seed: None,
            verbose: true,
        }
    }
}

fn default_n_iter() -> usize {
    50
}
fn default_cv_folds() -> usize {
    5
}
fn default_n_initial_points() -> usize {
    10
}
fn default_n_candidates() -> usize {
    1000
}
fn default_xi() -> f64 {
    0.01
}
fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg: ForetuneConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.io.column, "value");
        assert_eq!(cfg.io.target, "y");
        assert_eq!(cfg.arima.method, "aic");
        assert_eq!(cfg.arima.p, [0, 1, 2]);
        assert!(cfg.arima.d.is_none());
        assert_eq!(cfg.arima.max_d, 5);
        assert_eq!(cfg.boost.n_iter, 50);
        assert_eq!(cfg.boost.cv_folds, 5);
        assert!(cfg.boost.verbose);
        assert_eq!(cfg.boost.xi, 0.01);
    }

    #[test]
    fn parses_full_document() {
        let text = r#"
            [io]
            input = "series.csv"
            column = "flow"
            output = "report.json"

            [arima]
            method = "bic"
            p = [1, 2]
            q = [0]
            d = [0, 1]
            strict = true

            [boost]
            n_iter = 20
            xi = 0.05
            seed = 42
            verbose = false
        "#;
        let cfg: ForetuneConfig = toml::from_str(text).unwrap();
        assert_eq!(cfg.io.input, Some(PathBuf::from("series.csv")));
        assert_eq!(cfg.io.column, "flow");
        assert_eq!(cfg.arima.method, "bic");
        assert_eq!(cfg.arima.d, Some(vec![0, 1]));
        assert!(cfg.arima.strict);
        assert_eq!(cfg.boost.n_iter, 20);
        assert_eq!(cfg.boost.seed, Some(42));
        assert_eq!(cfg.boost.xi, 0.05);
        assert_eq!(cfg.boost.n_initial_points, 10);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = toml::from_str::<ForetuneConfig>("[arima]\norders = [1]\n").unwrap_err();
        assert!(err.to_string().contains("orders"), "{err}");
    }

    #[test]
    fn load_reads_file_and_reports_missing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[boost]\ncv_folds = 3").unwrap();
        let cfg = ForetuneConfig::load(file.path()).unwrap();
        assert_eq!(cfg.boost.cv_folds, 3);

        let err = ForetuneConfig::load(Path::new("/nonexistent/foretune.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config file"));
        assert_eq!(ForetuneConfig::load_or_default(None).unwrap().arima.max_d, 5);
    }
}
