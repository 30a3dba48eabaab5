//! Frictionless bar-to-bar return attribution and participation limits.
//!
//! Two close-to-close layouts exist. [`run_close_aligned`] pairs each position
//! with the return into its own bar, as the vectorized benchmarks do;
//! [`run_close`] lags it by one bar.

use crate::domain::series::{ensure_same_len, sign};
use crate::domain::SeriesError;

/// Open-to-open attribution: the position at bar i is entered at `open[i]`
/// and held to `open[i+1]`.
///
/// `out[i] = positions[i] * (open[i+1] - open[i]) / open[i]`, length `len - 1`;
/// `out[i]` is the return realized at bar `i + 1`.
pub fn run_ohlc(positions: &[f64], opens: &[f64]) -> Result<Vec<f64>, SeriesError> {
    hold_to_next(positions, opens)
}

/// Lagged close-to-close attribution with the same layout as [`run_ohlc`]: the
/// position decided at the close of bar i earns the move to the next close.
pub fn run_close(positions: &[f64], closes: &[f64]) -> Result<Vec<f64>, SeriesError> {
    hold_to_next(positions, closes)
}

/// Same-bar close-to-close attribution. `positions` and `returns` are
/// tail-aligned (both end on the last bar) and multiplied element-wise.
///
/// Returns the strategy returns and the positions that earned them.
pub fn run_close_aligned<'a>(positions: &'a [f64], returns: &[f64]) -> (Vec<f64>, &'a [f64]) {
    let n = positions.len().min(returns.len());
    let held = &positions[positions.len() - n..];
    let gross = held
        .iter()
        .zip(&returns[returns.len() - n..])
        .map(|(p, r)| p * r)
        .collect();
    (gross, held)
}

fn hold_to_next(positions: &[f64], prices: &[f64]) -> Result<Vec<f64>, SeriesError> {
    ensure_same_len(positions, prices)?;
    Ok(prices
        .windows(2)
        .zip(positions)
        .map(|(w, p)| p * (w[1] - w[0]) / w[0])
        .collect())
}

/// Cap each position to a fraction of the bar's volume:
/// `sign(p) * min(|p|, frac * volume)`.
pub fn fill_limit(frac: f64, positions: &[f64], volumes: &[f64]) -> Result<Vec<f64>, SeriesError> {
    ensure_same_len(positions, volumes)?;
    Ok(positions
        .iter()
        .zip(volumes)
        .map(|(p, v)| sign(*p) * p.abs().min(frac * v))
        .collect())
}
