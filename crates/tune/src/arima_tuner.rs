//! Information-criterion grid search over ARIMA orders.

use foretune_arima::{ArimaError, ArimaEstimator, ArimaOrder, ArimaSpec};
use foretune_stats::{SignificanceLevel, StatsError};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::criterion::Criterion;
use crate::error::TuneError;
use crate::space::{Domain, HyperparameterSpace};
use crate::traits::GridSearch;

/// Default cap on the differencing order searched by [`ArimaTuner::find_d()`].
pub const DEFAULT_MAX_D: usize = 5;

/// One scored grid point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScoreRecord {
    /// The candidate order.
    pub order: ArimaOrder,
    /// Its score (lower is better).
    pub score: f64,
}

/// Full outcome of [`ArimaTuner::grid_search_report()`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GridSearchReport {
    /// Scoring method used.
    pub criterion: Criterion,
    /// Winning order.
    pub best_order: ArimaOrder,
    /// Score of the winning order.
    pub best_score: f64,
    /// Every successfully scored order, in enumeration order.
    pub records: Vec<ScoreRecord>,
    /// Orders that failed to fit or score.
    pub skipped: Vec<ArimaOrder>,
}

/// Grid search over `(p, q, d)` ranked by AIC, BIC, or a coefficient
/// standard error.
///
/// By default a candidate that fails to fit is logged and skipped;
/// [`ArimaTuner::strict()`] turns the first failure into an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArimaTuner {
    strict: bool,
    max_d: usize,
}

impl Default for ArimaTuner {
    fn default() -> Self {
        Self {
            strict: false,
            max_d: DEFAULT_MAX_D,
        }
    }
}

impl ArimaTuner {
    /// Creates a lenient tuner with `max_d = 5`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aborts the search on the first failing candidate when `strict`.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the differencing cap for [`ArimaTuner::find_d()`].
    pub fn with_max_d(mut self, max_d: usize) -> Self {
        self.max_d = max_d;
        self
    }

    /// Akaike Information Criterion of a fresh fit of `order` on `train`.
    pub fn aic(&self, order: ArimaOrder, train: &[f64]) -> Result<f64, ArimaError> {
        Ok(ArimaSpec::from(order).fit(train)?.aic())
    }

    /// Bayesian Information Criterion of a fresh fit of `order` on `train`.
    pub fn bic(&self, order: ArimaOrder, train: &[f64]) -> Result<f64, ArimaError> {
        Ok(ArimaSpec::from(order).fit(train)?.bic())
    }

    /// Standard error of the parameter at index 1 of a fresh fit.
    ///
    /// # Errors
    ///
    /// [`ArimaError::MissingCoefficient`] before fitting when the order has
    /// fewer than two parameters; otherwise anything the fit or
    /// [`foretune_arima::ArimaFit::bse()`] returns.
    pub fn bse(&self, order: ArimaOrder, train: &[f64]) -> Result<f64, ArimaError> {
        let len = order.n_params();
        if len < 2 {
            return Err(ArimaError::MissingCoefficient { index: 1, len });
        }
        ArimaSpec::from(order).fit(train)?.bse_at(1)
    }

    /// Dispatches to the scorer for `criterion`.
    pub fn score(
        &self,
        criterion: Criterion,
        order: ArimaOrder,
        train: &[f64],
    ) -> Result<f64, ArimaError> {
        match criterion {
            Criterion::Aic => self.aic(order, train),
            Criterion::Bic => self.bic(order, train),
            Criterion::Bse => self.bse(order, train),
        }
    }

    /// Scores every `(p, q, d)` of `space` and reports all results.
    ///
    /// Enumeration is `p` outer, `q` middle, `d` inner. The best order is
    /// the first with the strictly smallest finite score.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`TuneError::UnknownMethod`] | `method` is not aic, bic or bse (checked before any fit) |
    /// | [`TuneError::MalformedSpace`] | keys other than exactly `p`, `q`, `d`; non-categorical or negative values |
    /// | [`TuneError::CandidateFailed`] | strict mode, first failing order |
    /// | [`TuneError::AllCandidatesFailed`] | no order produced a finite score |
    #[tracing::instrument(skip(self, space, train), fields(n = train.len()))]
    pub fn grid_search_report(
        &self,
        space: &HyperparameterSpace,
        method: &str,
        train: &[f64],
    ) -> Result<GridSearchReport, TuneError> {
        let criterion: Criterion = method.parse()?;
        let grid = ArimaGrid::from_space(space)?;

        let mut records = Vec::with_capacity(grid.len());
        let mut skipped = Vec::new();

        for order in grid.orders() {
            let score = match self.score(criterion, order, train) {
                Ok(score) => score,
                Err(source) if self.strict => {
                    return Err(TuneError::CandidateFailed { order, source });
                }
                Err(err) => {
                    warn!(%order, %err, "skipping ARIMA candidate");
                    skipped.push(order);
                    continue;
                }
            };
            info!(
                method = criterion.as_str(),
                score,
                %order,
                "{criterion} score = {score:.4}, cfg = {order}"
            );
            records.push(ScoreRecord { order, score });
        }

        let best =
            best_record(&records).ok_or(TuneError::AllCandidatesFailed { count: grid.len() })?;
        info!(
            method = criterion.as_str(),
            best_score = best.score,
            best_order = %best.order,
            skipped = skipped.len(),
            "ARIMA grid search finished"
        );
        Ok(GridSearchReport {
            criterion,
            best_order: best.order,
            best_score: best.score,
            records,
            skipped,
        })
    }

    /// Smallest differencing order at which `series` passes the augmented
    /// Dickey-Fuller test at the 5 % level.
    ///
    /// A series that becomes constant after differencing counts as
    /// stationary at that order.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`TuneError::NotStationary`] | still a unit root after `max_d` differences |
    /// | [`TuneError::Stats`] | series empty, non-finite, or too short to test |
    pub fn find_d(&self, series: &[f64]) -> Result<usize, TuneError> {
        for d in 0..=self.max_d {
            let diffed = foretune_stats::difference(series, d);
            let verdict = foretune_stats::is_stationary(&diffed, SignificanceLevel::FivePercent);
            let stationary = match verdict {
                Ok(stationary) => stationary,
                Err(StatsError::ConstantData) if d > 0 => true,
                Err(err) => return Err(err.into()),
            };
            debug!(d, stationary, "ADF differencing check");
            if stationary {
                return Ok(d);
            }
        }
        Err(TuneError::NotStationary { max_d: self.max_d })
    }
}

impl GridSearch for ArimaTuner {
    type Output = (ArimaOrder, ArimaEstimator);

    /// Runs [`ArimaTuner::grid_search_report()`] and binds the winning order
    /// to `train`.
    fn grid_search(
        &self,
        space: &HyperparameterSpace,
        method: &str,
        train: &[f64],
    ) -> Result<Self::Output, TuneError> {
        let report = self.grid_search_report(space, method, train)?;
        Ok((
            report.best_order,
            ArimaEstimator::new(train, report.best_order),
        ))
    }
}

/// First record with the strictly smallest finite score.
fn best_record(records: &[ScoreRecord]) -> Option<ScoreRecord> {
    records
        .iter()
        .filter(|r| r.score.is_finite())
        .fold(None, |best: Option<ScoreRecord>, r| match best {
            Some(b) if b.score <= r.score => Some(b),
            _ => Some(*r),
        })
}

/// Candidate lists extracted from a `p`/`q`/`d` space.
struct ArimaGrid {
    p: Vec<usize>,
    q: Vec<usize>,
    d: Vec<usize>,
}

impl ArimaGrid {
    fn from_space(space: &HyperparameterSpace) -> Result<Self, TuneError> {
        if let Some(extra) = space.names().find(|n| !matches!(*n, "p" | "q" | "d")) {
            return Err(TuneError::MalformedSpace(format!(
                "unexpected key {extra:?}; expected exactly p, q, d"
            )));
        }
        let list = |name: &str| -> Result<Vec<usize>, TuneError> {
            let Some(domain) = space.get(name) else {
                return Err(TuneError::MalformedSpace(format!("missing key {name:?}")));
            };
            let Domain::Categorical(values) = domain else {
                return Err(TuneError::MalformedSpace(format!(
                    "{name:?} must be a list of candidate orders"
                )));
            };
            if values.is_empty() {
                return Err(TuneError::MalformedSpace(format!("{name:?} is empty")));
            }
            values
                .iter()
                .map(|v| {
                    v.as_i64()
                        .and_then(|i| usize::try_from(i).ok())
                        .ok_or_else(|| {
                            TuneError::MalformedSpace(format!(
                                "{name:?} holds {v}, expected a non-negative integer"
                            ))
                        })
                })
                .collect()
        };
        Ok(Self {
            p: list("p")?,
            q: list("q")?,
            d: list("d")?,
        })
    }

    fn len(&self) -> usize {
        self.p.len() * self.q.len() * self.d.len()
    }

    fn orders(&self) -> impl Iterator<Item = ArimaOrder> + '_ {
        self.p.iter().flat_map(move |&p| {
            self.q
                .iter()
                .flat_map(move |&q| self.d.iter().map(move |&d| ArimaOrder::new(p, q, d)))
        })
    }
}
