//! Boost command: Bayesian search of gradient-boosting hyperparameters.

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{info, info_span};

use foretune_tune::{BayesianOptimisation, GradientBoostTuner, ParamSet, Trial};

use crate::cli::BoostArgs;
use crate::config::ForetuneConfig;
use crate::{convert, data};

#[derive(Debug, Serialize)]
struct BoostOutput<'a> {
    features: &'a [String],
    best_params: &'a ParamSet,
    best_score: f64,
    n_trees: usize,
    trials: &'a [Trial],
}

/// Run the Bayesian search pipeline.
pub fn run(args: BoostArgs) -> Result<()> {
    let _cmd = info_span!("boost").entered();
    let mut config = ForetuneConfig::load_or_default(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.boost.seed = Some(seed);
    }
    if let Some(n_iter) = args.iterations {
        config.boost.n_iter = n_iter;
    }

    let input = args
        .input
        .or(config.io.input)
        .ok_or_else(|| anyhow!("no input path: set [io].input in config or use --input"))?;
    let target = args.target.unwrap_or(config.io.target);
    let table = data::read_table(&input, &target)?;
    info!(
        path = %input.display(),
        n_rows = table.y.len(),
        n_features = table.features.len(),
        "training table loaded"
    );

    let tuner = GradientBoostTuner::new(convert::build_bayes_config(&config.boost));
    let search = tuner
        .bayesian_optimisation(table.x.view(), table.y.view())
        .context("Bayesian search failed")?;

    let output = args.output.or(config.io.output);
    data::write_json(
        &BoostOutput {
            features: &table.features,
            best_params: search.best_params(),
            best_score: search.best_score(),
            n_trees: search.best_estimator().n_trees(),
            trials: search.trials(),
        },
        output.as_deref(),
    )
}
