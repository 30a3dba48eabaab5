//! Performance metrics: pure functions over a realized-return series.
//!
//! Every metric takes per-bar returns (and, for trade counts, the position
//! path) and returns a scalar. Dispersion uses the population standard
//! deviation; annualization assumes 252 trading days.

use serde::{Deserialize, Serialize};

use edgelab_core::domain::series::{cumulative_product, diff_from_zero, mean, population_std};
use edgelab_core::domain::{EPSILON, TRADING_DAYS};
use edgelab_core::risk::drawdown_series;

/// Aggregate performance metrics for one return series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsResult {
    pub sharpe: f64,
    pub sortino: f64,
    pub max_drawdown: f64,
    pub max_dd_duration: usize,
    pub total_return: f64,
    pub cagr: f64,
    pub ann_vol: f64,
    pub calmar: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub expectancy: f64,
    pub skew: f64,
    pub kurtosis: f64,
    pub trades: usize,
    pub time_in_market: f64,
}

impl MetricsResult {
    /// Compute every metric. `positions` only feeds `trades` and
    /// `time_in_market`; pass an empty slice when there is no position path.
    ///
    /// An empty return series yields all zeros.
    pub fn compute(returns: &[f64], positions: &[f64]) -> Self {
        if returns.is_empty() {
            return Self {
                trades: trades(positions),
                time_in_market: time_in_market(positions),
                ..Self::default()
            };
        }
        Self {
            sharpe: sharpe(returns),
            sortino: sortino(returns),
            max_drawdown: max_drawdown(returns),
            max_dd_duration: max_dd_duration(returns),
            total_return: total_return(returns),
            cagr: cagr(returns),
            ann_vol: ann_vol(returns),
            calmar: calmar(returns),
            win_rate: win_rate(returns),
            profit_factor: profit_factor(returns),
            avg_win: avg_win(returns),
            avg_loss: avg_loss(returns),
            expectancy: expectancy(returns),
            skew: skew(returns),
            kurtosis: kurtosis(returns),
            trades: trades(positions),
            time_in_market: time_in_market(positions),
        }
    }
}

// ─── Risk-adjusted return ───────────────────────────────────────────

/// `sqrt(252) * mean(r) / max(pstd(r), eps)`.
pub fn sharpe(returns: &[f64]) -> f64 {
    TRADING_DAYS.sqrt() * mean(returns) / population_std(returns).max(EPSILON)
}

/// Sharpe with the downside deviation `sqrt(mean(min(r, 0)^2))` in place of pstd.
pub fn sortino(returns: &[f64]) -> f64 {
    let downside: Vec<f64> = returns.iter().map(|r| r.min(0.0).powi(2)).collect();
    TRADING_DAYS.sqrt() * mean(returns) / mean(&downside).sqrt().max(EPSILON)
}

/// `CAGR / max(|MaxDD|, eps)`.
pub fn calmar(returns: &[f64]) -> f64 {
    cagr(returns) / max_drawdown(returns).abs().max(EPSILON)
}

// ─── Drawdown ───────────────────────────────────────────────────────

/// Minimum of the drawdown series (<= 0). Zero for an empty series.
pub fn max_drawdown(returns: &[f64]) -> f64 {
    drawdown_series(returns).into_iter().fold(0.0, f64::min)
}

/// Longest run of consecutive bars with negative drawdown.
pub fn max_dd_duration(returns: &[f64]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for dd in drawdown_series(returns) {
        current = if dd < 0.0 { current + 1 } else { 0 };
        longest = longest.max(current);
    }
    longest
}

// ─── Growth ─────────────────────────────────────────────────────────

/// Cumulative product of `1 + r`.
pub fn equity_curve(returns: &[f64]) -> Vec<f64> {
    cumulative_product(returns)
}

/// `prod(1 + r) - 1`.
pub fn total_return(returns: &[f64]) -> f64 {
    returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0
}

/// `prod(1 + r)^(252 / len) - 1`. Zero for an empty series.
pub fn cagr(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let growth: f64 = returns.iter().map(|r| 1.0 + r).product();
    growth.powf(TRADING_DAYS / returns.len() as f64) - 1.0
}

/// `pstd(r) * sqrt(252)`.
pub fn ann_vol(returns: &[f64]) -> f64 {
    population_std(returns) * TRADING_DAYS.sqrt()
}

// ─── Win/loss ───────────────────────────────────────────────────────

/// Positive bars over non-zero bars.
pub fn win_rate(returns: &[f64]) -> f64 {
    let wins = returns.iter().filter(|r| **r > 0.0).count();
    let active = returns.iter().filter(|r| **r != 0.0).count();
    wins as f64 / active.max(1) as f64
}

/// Gross gains over gross losses, loss floored at eps.
pub fn profit_factor(returns: &[f64]) -> f64 {
    let gains: f64 = returns.iter().filter(|r| **r > 0.0).sum();
    let losses: f64 = returns.iter().filter(|r| **r < 0.0).sum();
    gains / losses.abs().max(EPSILON)
}

fn subset_mean(returns: &[f64], keep: impl Fn(f64) -> bool) -> f64 {
    let (sum, count) = returns
        .iter()
        .filter(|r| keep(**r))
        .fold((0.0, 0usize), |(s, c), r| (s + r, c + 1));
    sum / count.max(1) as f64
}

pub fn avg_win(returns: &[f64]) -> f64 {
    subset_mean(returns, |r| r > 0.0)
}

pub fn avg_loss(returns: &[f64]) -> f64 {
    subset_mean(returns, |r| r < 0.0)
}

/// `WinRate * AvgWin + (1 - WinRate) * AvgLoss`.
pub fn expectancy(returns: &[f64]) -> f64 {
    let wr = win_rate(returns);
    wr * avg_win(returns) + (1.0 - wr) * avg_loss(returns)
}

// ─── Distribution shape ─────────────────────────────────────────────

fn standardized_moment(returns: &[f64], power: i32) -> f64 {
    let m = mean(returns);
    let s = population_std(returns).max(EPSILON);
    let z: Vec<f64> = returns.iter().map(|r| ((r - m) / s).powi(power)).collect();
    mean(&z)
}

pub fn skew(returns: &[f64]) -> f64 {
    standardized_moment(returns, 3)
}

/// Excess kurtosis (normal = 0).
pub fn kurtosis(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    standardized_moment(returns, 4) - 3.0
}

// ─── Position path ──────────────────────────────────────────────────

/// Bars where the position changed, counting the move out of the implicit
/// flat state before bar 0.
pub fn trades(positions: &[f64]) -> usize {
    diff_from_zero(positions)
        .iter()
        .filter(|d| **d != 0.0)
        .count()
}

/// Fraction of bars with a non-zero position.
pub fn time_in_market(positions: &[f64]) -> f64 {
    if positions.is_empty() {
        return 0.0;
    }
    positions.iter().filter(|p| **p != 0.0).count() as f64 / positions.len() as f64
}
