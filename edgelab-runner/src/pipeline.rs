//! Single-asset moving-average crossover pipeline.
//!
//! Chains the core components for one bar series:
//! indicators -> signal -> fill/hold -> risk overlays -> participation cap
//! -> return attribution -> costs -> metrics.
//!
//! Positions are decided at the close of each bar from data up to that close.
//! The default close-to-close attribution pairs each position with the return
//! into its own bar, matching the vectorized reference runs. The `next_close`,
//! `next_open` and `stop_loss` attributions hold it over the following bar
//! instead and drop the last position.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use edgelab_core::config::{check_window, ConfigError};
use edgelab_core::domain::series::{prev, tail_align};
use edgelab_core::domain::{BarSeries, SeriesError};
use edgelab_core::execution::{
    fill_limit, run_close, run_close_aligned, run_ohlc, slippage, turnover_costs, Attribution,
    ExecutionConfig, StopLoss,
};
use edgelab_core::indicators::moving_average;
use edgelab_core::risk::RiskConfig;
use edgelab_core::signals::{fill, hold, trend_direction};

use crate::metrics::{equity_curve, MetricsResult};

/// Errors from a single pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("series error: {0}")]
    Series(#[from] SeriesError),
    #[error("need at least {required} bars, got {bars}")]
    InsufficientData { bars: usize, required: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Fast moving-average window
    pub fast: usize,
    /// Slow moving-average window
    pub slow: usize,
    /// Minimum bars to keep a new position
    pub hold: usize,
    pub execution: ExecutionConfig,
    pub risk: RiskConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fast: 10,
            slow: 50,
            hold: 5,
            execution: ExecutionConfig::default(),
            risk: RiskConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_window("pipeline.fast", self.fast)?;
        check_window("pipeline.slow", self.slow)?;
        self.execution.validate()?;
        self.risk.validate()?;
        Ok(())
    }

    /// Bars consumed before the first position exists.
    pub fn warm_up(&self) -> usize {
        self.fast.max(self.slow).saturating_sub(1)
    }
}

/// Output of one pipeline run. `positions`, `returns` and `equity` share
/// one length; `positions[k]` is the position decided at the close of bar
/// `offset + k` and `returns[k]` is what it earned net of costs under the
/// configured attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub offset: usize,
    pub dates: Vec<NaiveDate>,
    pub positions: Vec<f64>,
    pub returns: Vec<f64>,
    pub equity: Vec<f64>,
    pub metrics: MetricsResult,
}

/// Run the crossover pipeline over `bars`.
pub fn run_pipeline(
    bars: &BarSeries,
    config: &PipelineConfig,
) -> Result<PipelineResult, PipelineError> {
    config.validate()?;

    let offset = config.warm_up();
    // One bar for the first position and one more for it to earn a return.
    let required = offset + 2;
    if bars.len() < required {
        return Err(PipelineError::InsufficientData {
            bars: bars.len(),
            required,
        });
    }

    let closes = bars.closes();
    let volumes = bars.volumes();
    let close_returns = bars.close_returns();

    // Signal
    let fast = moving_average(&closes, config.fast);
    let slow = moving_average(&closes, config.slow);
    let (fast, slow) = tail_align(&fast, &slow);
    let raw = trend_direction(fast, slow)?;
    let mut positions = hold(&fill(&raw), config.hold);

    // Risk overlays, monitored on the asset's close-to-close return into each bar
    if !config.risk.is_empty() {
        let monitored: Vec<f64> = (offset..bars.len())
            .map(|i| prev(&close_returns, i))
            .collect();
        positions = config.risk.apply(&positions, &monitored)?;
    }

    if let Some(frac) = config.execution.participation {
        positions = fill_limit(frac, &positions, &volumes[offset..])?;
    }

    // Attribution. `first` is the bar of the first kept position and
    // `held_from` the bar whose volume its trade is charged against.
    let (first, held_from, gross, traded) = match config.execution.attribution {
        Attribution::CloseToClose => {
            let (gross, held) = run_close_aligned(&positions, &close_returns);
            let first = bars.len() - held.len();
            (first, first, gross, held.to_vec())
        }
        // The last position has no following bar to earn on.
        Attribution::NextClose => {
            let gross = run_close(&positions, &closes[offset..])?;
            let decided = positions[..positions.len() - 1].to_vec();
            (offset, offset + 1, gross, decided)
        }
        Attribution::NextOpen => {
            let decided = &positions[..positions.len() - 1];
            let opens = bars.opens();
            let mut gross = run_ohlc(decided, &opens[offset + 1..])?;
            // The final entry has no closing open; it earns open-to-close.
            if let (Some(last), Some(p)) = (bars.bars().last(), decided.last()) {
                gross.push(p * (last.close - last.open) / last.open);
            }
            (offset, offset + 1, gross, decided.to_vec())
        }
        Attribution::StopLoss { pct } => {
            let decided = &positions[..positions.len() - 1];
            let entry_bars = bars.slice(offset + 1, bars.len());
            let outcome = StopLoss::new(pct).simulate(decided, &entry_bars)?;
            debug!(triggers = outcome.trigger_count(), "stop-loss pass complete");
            (offset, offset + 1, outcome.strategy_returns, outcome.positions)
        }
    };

    let mut costs = turnover_costs(config.execution.cost_rate, &traded);
    if let Some(adv) = config.execution.adv_frac {
        let impact = slippage(adv, &traded, &volumes[held_from..held_from + traded.len()])?;
        for (c, s) in costs.iter_mut().zip(impact) {
            *c += s;
        }
    }

    let returns: Vec<f64> = gross.iter().zip(&costs).map(|(g, c)| g - c).collect();
    let equity = equity_curve(&returns);
    let metrics = MetricsResult::compute(&returns, &traded);
    let dates = bars.dates()[first..first + traded.len()].to_vec();

    debug!(
        bars = bars.len(),
        offset = first,
        trades = metrics.trades,
        sharpe = metrics.sharpe,
        "pipeline complete"
    );

    Ok(PipelineResult {
        offset: first,
        dates,
        positions: traded,
        returns,
        equity,
        metrics,
    })
}
