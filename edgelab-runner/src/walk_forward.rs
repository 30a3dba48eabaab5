//! Walk-forward optimization: rolling train/test folds with grid search.
//!
//! Each fold trains on a fixed-length window and tests on the bars that
//! immediately follow it:
//! - Fold i: train = [i * test_len, i * test_len + train_len), test = the next test_len bars
//! - fold count = 1 + (N - train_len - test_len) / test_len
//!
//! Train and test windows are scored the same way, on their own bars only:
//! each position is paired with the close-to-close return into its bar, so a
//! window of L bars yields `L - warm_up` returns.
//!
//! Every (fold, parameter tuple) pair is an independent task. Tasks run on the
//! rayon pool (or sequentially) and are merged by (fold, grid index), so the
//! result does not depend on completion order.

use std::ops::Range;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use edgelab_core::config::{check_non_negative, check_window, ConfigError};
use edgelab_core::domain::series::{simple_returns, tail_align};
use edgelab_core::domain::{BarSeries, SeriesError};
use edgelab_core::execution::{run_close_aligned, turnover_costs};
use edgelab_core::indicators::moving_average;
use edgelab_core::signals::long_only_trend;

use crate::metrics::{sharpe, MetricsResult};

// ─── Configuration ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkForwardConfig {
    /// Training window length in bars (default 504 = 2 years).
    pub train_len: usize,
    /// Test window length in bars, also the roll step (default 126).
    pub test_len: usize,
    /// Proportional cost per unit of position change.
    pub cost_rate: f64,
    /// Evaluate tasks on the rayon pool.
    pub parallel: bool,
}

impl Default for WalkForwardConfig {
    fn default() -> Self {
        Self {
            train_len: 504,
            test_len: 126,
            cost_rate: 0.001,
            parallel: true,
        }
    }
}

impl WalkForwardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_window("walk_forward.train_len", self.train_len)?;
        check_window("walk_forward.test_len", self.test_len)?;
        check_non_negative("walk_forward.cost_rate", self.cost_rate)?;
        Ok(())
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// One moving-average crossover parameter tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaCrossParams {
    pub fast: usize,
    pub slow: usize,
}

impl MaCrossParams {
    pub fn new(fast: usize, slow: usize) -> Self {
        Self { fast, slow }
    }

    /// Bars consumed before the first position exists.
    pub fn warm_up(&self) -> usize {
        self.fast.max(self.slow).saturating_sub(1)
    }

    /// Shortest window that yields at least one return.
    pub fn min_bars(&self) -> usize {
        (self.warm_up() + 1).max(2)
    }
}

/// Fast and slow window lists; the grid is their cartesian product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    pub fast: Vec<usize>,
    pub slow: Vec<usize>,
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self::cartesian(&[5, 10, 15, 20], &[30, 40, 50, 60, 70])
    }
}

impl ParamGrid {
    pub fn cartesian(fast: &[usize], slow: &[usize]) -> Self {
        Self {
            fast: fast.to_vec(),
            slow: slow.to_vec(),
        }
    }

    /// Tuples in fast-major order; this order breaks score ties.
    pub fn params(&self) -> Vec<MaCrossParams> {
        self.fast
            .iter()
            .flat_map(|&f| self.slow.iter().map(move |&s| MaCrossParams::new(f, s)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fast.len() * self.slow.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for &n in self.fast.iter().chain(&self.slow) {
            check_window("walk_forward.grid", n)?;
        }
        Ok(())
    }
}

// ─── Result types ────────────────────────────────────────────────────

/// Bar index ranges of one fold (end-exclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fold {
    pub index: usize,
    pub train: Range<usize>,
    pub test: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldOutcome {
    pub fold: Fold,
    pub best_params: MaCrossParams,
    /// In-sample Sharpe of the selected tuple.
    pub train_score: f64,
    /// Sharpe of the selected tuple on the test window.
    pub test_sharpe: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkForwardResult {
    pub folds: Vec<FoldOutcome>,
    /// Chronological out-of-sample net returns, one per test bar past the
    /// selected tuple's warm-up.
    pub oos_returns: Vec<f64>,
    /// Positions that earned `oos_returns`.
    pub oos_positions: Vec<f64>,
    /// Date of the bar each out-of-sample return was realized on.
    pub oos_dates: Vec<NaiveDate>,
    pub metrics: MetricsResult,
}

#[derive(Debug, Error)]
pub enum WalkForwardError {
    #[error("insufficient data: {total_bars} bars < train {train_len} + test {test_len}")]
    InsufficientData {
        total_bars: usize,
        train_len: usize,
        test_len: usize,
    },
    #[error("no parameter tuple fits the training window of fold {fold}")]
    NoEvaluableParams { fold: usize },
    #[error("parameter grid is empty")]
    EmptyGrid,
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("series error: {0}")]
    Series(#[from] SeriesError),
}

// ─── Fold creation ───────────────────────────────────────────────────

/// `1 + (N - train - test) / test`, or 0 when one fold does not fit.
pub fn fold_count(total_bars: usize, train_len: usize, test_len: usize) -> usize {
    match total_bars.checked_sub(train_len + test_len) {
        Some(spare) if test_len > 0 => 1 + spare / test_len,
        _ => 0,
    }
}

/// Rolling fixed-length folds. A non-positive fold count is fatal.
pub fn create_folds(
    total_bars: usize,
    config: &WalkForwardConfig,
) -> Result<Vec<Fold>, WalkForwardError> {
    let count = fold_count(total_bars, config.train_len, config.test_len);
    if count == 0 {
        return Err(WalkForwardError::InsufficientData {
            total_bars,
            train_len: config.train_len,
            test_len: config.test_len,
        });
    }
    Ok((0..count)
        .map(|index| {
            let start = index * config.test_len;
            let split = start + config.train_len;
            Fold {
                index,
                train: start..split,
                test: split..split + config.test_len,
            }
        })
        .collect())
}

// ─── Strategy evaluation ─────────────────────────────────────────────

/// Long/flat crossover positions over `closes`; `out[k]` is decided at the
/// close of bar `warm_up + k`.
pub fn long_flat_positions(
    params: &MaCrossParams,
    closes: &[f64],
) -> Result<Vec<f64>, SeriesError> {
    let fast = moving_average(closes, params.fast);
    let slow = moving_average(closes, params.slow);
    let (fast, slow) = tail_align(&fast, &slow);
    long_only_trend(fast, slow)
}

/// Net returns of the crossover over `closes`. Positions are tail-aligned
/// with the window's close-to-close returns, so `held[k]` earns the return
/// into its own bar, less `cost_rate * |held[k] - held[k-1]|` with the
/// position before the first one taken as flat.
///
/// Returns `(net, held)`, both ending on the last bar of `closes`. Empty when
/// `closes` is shorter than [`MaCrossParams::min_bars`].
pub fn net_returns(
    params: &MaCrossParams,
    closes: &[f64],
    cost_rate: f64,
) -> Result<(Vec<f64>, Vec<f64>), SeriesError> {
    if closes.len() < params.min_bars() {
        return Ok((Vec::new(), Vec::new()));
    }
    let positions = long_flat_positions(params, closes)?;
    let returns = simple_returns(closes);
    let (gross, held) = run_close_aligned(&positions, &returns);
    let costs = turnover_costs(cost_rate, held);
    let net = gross.iter().zip(&costs).map(|(g, c)| g - c).collect();
    Ok((net, held.to_vec()))
}

struct TaskScore {
    fold: usize,
    grid_index: usize,
    score: Option<f64>,
}

fn score_task(
    fold: &Fold,
    grid_index: usize,
    params: &MaCrossParams,
    closes: &[f64],
    cost_rate: f64,
) -> Result<TaskScore, SeriesError> {
    let window = &closes[fold.train.clone()];
    let score = if window.len() < params.min_bars() {
        warn!(
            fold = fold.index,
            fast = params.fast,
            slow = params.slow,
            window = window.len(),
            "parameter tuple does not fit the training window, skipped"
        );
        None
    } else {
        let (net, _) = net_returns(params, window, cost_rate)?;
        Some(sharpe(&net))
    };
    Ok(TaskScore {
        fold: fold.index,
        grid_index,
        score,
    })
}

/// First-seen maximum: a later tuple must score strictly higher to win.
fn select_best(scores: &[TaskScore]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for task in scores {
        if let Some(score) = task.score {
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((task.grid_index, score));
            }
        }
    }
    best
}

// ─── Walk-forward orchestration ──────────────────────────────────────

/// Select the best tuple on each training window, evaluate it on the
/// following test window, and concatenate the out-of-sample returns.
pub fn run_walk_forward(
    bars: &BarSeries,
    grid: &ParamGrid,
    config: &WalkForwardConfig,
) -> Result<WalkForwardResult, WalkForwardError> {
    config.validate()?;
    grid.validate()?;
    if grid.is_empty() {
        return Err(WalkForwardError::EmptyGrid);
    }

    let folds = create_folds(bars.len(), config)?;
    let params = grid.params();
    let closes = bars.closes();
    let dates = bars.dates();

    info!(
        folds = folds.len(),
        grid = params.len(),
        train_len = config.train_len,
        test_len = config.test_len,
        parallel = config.parallel,
        "walk-forward start"
    );

    let tasks: Vec<(&Fold, usize)> = folds
        .iter()
        .flat_map(|fold| (0..params.len()).map(move |g| (fold, g)))
        .collect();
    let run = |&(fold, g): &(&Fold, usize)| {
        score_task(fold, g, &params[g], &closes, config.cost_rate)
    };
    let mut scores: Vec<TaskScore> = if config.parallel {
        tasks.par_iter().map(run).collect::<Result<Vec<_>, _>>()?
    } else {
        tasks.iter().map(run).collect::<Result<Vec<_>, _>>()?
    };
    scores.sort_by_key(|t| (t.fold, t.grid_index));

    let mut outcomes = Vec::with_capacity(folds.len());
    let mut oos_returns = Vec::with_capacity(folds.len() * config.test_len);
    let mut oos_positions = Vec::with_capacity(folds.len() * config.test_len);
    let mut oos_dates = Vec::with_capacity(folds.len() * config.test_len);

    for (fold, fold_scores) in folds.iter().zip(scores.chunks(params.len())) {
        let (best_index, train_score) = select_best(fold_scores)
            .ok_or(WalkForwardError::NoEvaluableParams { fold: fold.index })?;
        let best = params[best_index];

        let (test_returns, test_positions) =
            net_returns(&best, &closes[fold.test.clone()], config.cost_rate)?;
        if test_returns.is_empty() {
            warn!(
                fold = fold.index,
                fast = best.fast,
                slow = best.slow,
                test_len = fold.test.len(),
                "selected tuple does not fit the test window"
            );
        }
        let test_sharpe = sharpe(&test_returns);

        debug!(
            fold = fold.index,
            fast = best.fast,
            slow = best.slow,
            train_score,
            test_sharpe,
            "fold selected"
        );

        oos_returns.extend_from_slice(&test_returns);
        oos_positions.extend_from_slice(&test_positions);
        // Returns end on the last test bar.
        let first_realized = fold.test.end - test_returns.len();
        oos_dates.extend_from_slice(&dates[first_realized..fold.test.end]);
        outcomes.push(FoldOutcome {
            fold: fold.clone(),
            best_params: best,
            train_score,
            test_sharpe,
        });
    }

    let metrics = MetricsResult::compute(&oos_returns, &oos_positions);
    info!(
        oos_bars = oos_returns.len(),
        sharpe = metrics.sharpe,
        max_drawdown = metrics.max_drawdown,
        "walk-forward complete"
    );

    Ok(WalkForwardResult {
        folds: outcomes,
        oos_returns,
        oos_positions,
        oos_dates,
        metrics,
    })
}
