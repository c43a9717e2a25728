use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Hyperparameter search for forecasting models.
#[derive(Parser)]
#[command(
    name = "foretune",
    version,
    about = "Hyperparameter search for ARIMA and gradient-boosted models"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Grid-search ARIMA orders on a univariate series.
    Arima(ArimaArgs),
    /// Bayesian search of gradient-boosting hyperparameters.
    Boost(BoostArgs),
}

/// Arguments for the `arima` subcommand.
#[derive(clap::Args)]
pub struct ArimaArgs {
    /// Path to TOML configuration file; built-in defaults when absent.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override input CSV path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override the series column name from config.
    #[arg(long)]
    pub column: Option<String>,

    /// Override the scoring method (aic, bic, bse).
    #[arg(short, long)]
    pub method: Option<String>,

    /// Choose `d` by the ADF test instead of the configured list.
    #[arg(long)]
    pub auto_d: bool,

    /// Forecast this many steps ahead with the winning order.
    #[arg(long)]
    pub forecast: Option<usize>,

    /// Override output JSON path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `boost` subcommand.
#[derive(clap::Args)]
pub struct BoostArgs {
    /// Path to TOML configuration file; built-in defaults when absent.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override input CSV path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override the target column name from config.
    #[arg(short, long)]
    pub target: Option<String>,

    /// Override the search seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Override the number of search iterations from config.
    #[arg(long = "iterations", visible_alias = "n-iter")]
    pub iterations: Option<usize>,

    /// Override output JSON path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
