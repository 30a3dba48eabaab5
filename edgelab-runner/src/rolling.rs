//! Rolling and benchmark-relative metrics.
//!
//! Windowed outputs drop their first `n - 1` positions, like the windowed
//! indicators: `out[k]` covers inputs `k..k + n`. Dispersion here is the
//! sample (ddof = 1) standard deviation.

use serde::{Deserialize, Serialize};

use edgelab_core::domain::series::{ensure_same_len, mean, sample_std, sample_variance};
use edgelab_core::domain::{SeriesError, EPSILON, TRADING_DAYS};
use edgelab_core::risk::drawdown_series;

use crate::metrics::cagr;

fn windows(n: usize, values: &[f64]) -> Result<std::slice::Windows<'_, f64>, SeriesError> {
    if n == 0 {
        return Err(SeriesError::InvalidWindow {
            window: n,
            len: values.len(),
        });
    }
    Ok(values.windows(n))
}

fn sample_covariance(a: &[f64], b: &[f64]) -> f64 {
    if a.len() < 2 {
        return 0.0;
    }
    let (ma, mb) = (mean(a), mean(b));
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - ma) * (y - mb)).sum();
    sum / (a.len() - 1) as f64
}

fn beta(returns: &[f64], benchmark: &[f64]) -> f64 {
    sample_covariance(returns, benchmark) / sample_variance(benchmark).max(EPSILON)
}

// ─── Rolling ────────────────────────────────────────────────────────

/// Annualized Sharpe per trailing window.
pub fn rolling_sharpe(n: usize, returns: &[f64]) -> Result<Vec<f64>, SeriesError> {
    Ok(windows(n, returns)?
        .map(|w| mean(w) / sample_std(w).max(EPSILON) * TRADING_DAYS.sqrt())
        .collect())
}

/// Annualized volatility per trailing window.
pub fn rolling_vol(n: usize, returns: &[f64]) -> Result<Vec<f64>, SeriesError> {
    Ok(windows(n, returns)?
        .map(|w| sample_std(w) * TRADING_DAYS.sqrt())
        .collect())
}

/// `cov(r, b) / var(b)` per trailing window.
pub fn rolling_beta(n: usize, returns: &[f64], benchmark: &[f64]) -> Result<Vec<f64>, SeriesError> {
    ensure_same_len(returns, benchmark)?;
    Ok(windows(n, returns)?
        .zip(benchmark.windows(n))
        .map(|(r, b)| beta(r, b))
        .collect())
}

// ─── Benchmark-relative ─────────────────────────────────────────────

/// Jensen's alpha on annualized growth: `CAGR(r) - rf - beta * (CAGR(b) - rf)`.
pub fn alpha(returns: &[f64], benchmark: &[f64], rf: f64) -> Result<f64, SeriesError> {
    ensure_same_len(returns, benchmark)?;
    let b = beta(returns, benchmark);
    Ok(cagr(returns) - rf - b * (cagr(benchmark) - rf))
}

/// Annualized mean active return over tracking error.
pub fn information_ratio(returns: &[f64], benchmark: &[f64]) -> Result<f64, SeriesError> {
    ensure_same_len(returns, benchmark)?;
    let active: Vec<f64> = returns.iter().zip(benchmark).map(|(r, b)| r - b).collect();
    Ok(mean(&active) / sample_std(&active).max(EPSILON) * TRADING_DAYS.sqrt())
}

/// Strategy return captured on benchmark up bars.
pub fn upside_capture(returns: &[f64], benchmark: &[f64]) -> Result<f64, SeriesError> {
    ensure_same_len(returns, benchmark)?;
    let (strat, bench) = masked_sums(returns, benchmark, |b| b > 0.0);
    Ok(strat / bench.max(EPSILON))
}

/// Strategy return captured on benchmark down bars. Above 1 means the
/// strategy lost more than the benchmark.
pub fn downside_capture(returns: &[f64], benchmark: &[f64]) -> Result<f64, SeriesError> {
    ensure_same_len(returns, benchmark)?;
    let (strat, bench) = masked_sums(returns, benchmark, |b| b < 0.0);
    Ok(strat / -bench.abs().max(EPSILON))
}

fn masked_sums(returns: &[f64], benchmark: &[f64], keep: impl Fn(f64) -> bool) -> (f64, f64) {
    returns
        .iter()
        .zip(benchmark)
        .filter(|(_, b)| keep(**b))
        .fold((0.0, 0.0), |(s, t), (r, b)| (s + r, t + b))
}

// ─── Drawdown episodes ──────────────────────────────────────────────

/// One maximal run of bars below the running peak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownEpisode {
    /// First bar below the peak
    pub start: usize,
    /// Bar with the deepest drawdown (first one on ties)
    pub trough: usize,
    /// First bar back at a peak; `None` if still under water
    pub end: Option<usize>,
    /// Drawdown at the trough (negative)
    pub depth: f64,
}

impl DrawdownEpisode {
    /// Bars spent under water.
    pub fn duration(&self, total_len: usize) -> usize {
        self.end.unwrap_or(total_len) - self.start
    }
}

pub fn drawdown_episodes(returns: &[f64]) -> Vec<DrawdownEpisode> {
    let mut episodes = Vec::new();
    let mut open: Option<DrawdownEpisode> = None;

    for (i, dd) in drawdown_series(returns).into_iter().enumerate() {
        if dd < 0.0 {
            let ep = open.get_or_insert(DrawdownEpisode {
                start: i,
                trough: i,
                end: None,
                depth: dd,
            });
            if dd < ep.depth {
                ep.depth = dd;
                ep.trough = i;
            }
        } else if let Some(mut ep) = open.take() {
            ep.end = Some(i);
            episodes.push(ep);
        }
    }
    episodes.extend(open);
    episodes
}
