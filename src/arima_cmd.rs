//! Arima command: grid-search ARIMA orders on one CSV column.

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{info, info_span};

use foretune_arima::ArimaEstimator;
use foretune_tune::GridSearchReport;

use crate::cli::ArimaArgs;
use crate::config::ForetuneConfig;
use crate::{convert, data};

#[derive(Debug, Serialize)]
struct ArimaOutput {
    /// `d` chosen by the ADF test, when it was searched for.
    found_d: Option<usize>,
    report: GridSearchReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    forecast: Option<Vec<f64>>,
}

/// Run the ARIMA grid search pipeline.
pub fn run(args: ArimaArgs) -> Result<()> {
    let _cmd = info_span!("arima").entered();
    let mut config = ForetuneConfig::load_or_default(args.config.as_deref())?;
    if let Some(method) = args.method {
        config.arima.method = method;
    }
    let criterion = convert::parse_method(&config.arima.method)?;

    let input = args
        .input
        .or(config.io.input)
        .ok_or_else(|| anyhow!("no input path: set [io].input in config or use --input"))?;
    let column = args.column.unwrap_or(config.io.column);
    let series = data::read_series(&input, &column)?;
    info!(path = %input.display(), column = %column, n = series.len(), "series loaded");

    let tuner = convert::build_arima_tuner(&config.arima);
    let (d, found_d) = match config.arima.d.take() {
        Some(d) if !args.auto_d => (d, None),
        _ => {
            let d = tuner
                .find_d(&series)
                .context("failed to choose the differencing order")?;
            info!(d, "differencing order chosen by ADF test");
            (vec![d], Some(d))
        }
    };
    let space = convert::build_arima_space(&config.arima.p, &config.arima.q, &d)?;

    let report = tuner
        .grid_search_report(&space, criterion.as_str(), &series)
        .context("ARIMA grid search failed")?;

    let forecast = match args.forecast {
        Some(horizon) => {
            let fit = ArimaEstimator::new(&series, report.best_order)
                .fit()
                .with_context(|| format!("failed to refit ARIMA{}", report.best_order))?;
            Some(fit.forecast(horizon))
        }
        None => None,
    };

    let output = args.output.or(config.io.output);
    data::write_json(
        &ArimaOutput {
            found_d,
            report,
            forecast,
        },
        output.as_deref(),
    )
}
