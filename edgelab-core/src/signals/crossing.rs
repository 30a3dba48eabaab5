//! Crossing and threshold detectors.
//!
//! Every detector compares bar i against the previous bar through the shared
//! zero-sentinel accessor, so bar 0 always compares against 0. Outputs are 0/1
//! event series (or -1/0/+1 for trend direction) of the input length.

use crate::domain::series::{ensure_same_len, prev};
use crate::domain::SeriesError;

/// 1 where `fast` moves to at-or-above `slow` from strictly below.
pub fn cross_up(fast: &[f64], slow: &[f64]) -> Result<Vec<f64>, SeriesError> {
    ensure_same_len(fast, slow)?;
    Ok((0..fast.len())
        .map(|i| event(fast[i] >= slow[i] && prev(fast, i) < prev(slow, i)))
        .collect())
}

/// 1 where `fast` moves to at-or-below `slow` from strictly above.
pub fn cross_down(fast: &[f64], slow: &[f64]) -> Result<Vec<f64>, SeriesError> {
    ensure_same_len(fast, slow)?;
    Ok((0..fast.len())
        .map(|i| event(fast[i] <= slow[i] && prev(fast, i) > prev(slow, i)))
        .collect())
}

/// 1 where `values` rises strictly above `level` from at-or-below it.
pub fn threshold_up(values: &[f64], level: f64) -> Vec<f64> {
    (0..values.len())
        .map(|i| event(values[i] > level && prev(values, i) <= level))
        .collect()
}

/// 1 where `values` falls strictly below `level` from at-or-above it.
pub fn threshold_down(values: &[f64], level: f64) -> Vec<f64> {
    (0..values.len())
        .map(|i| event(values[i] < level && prev(values, i) >= level))
        .collect()
}

/// +1 where fast > slow, -1 where fast < slow, 0 on equality.
pub fn trend_direction(fast: &[f64], slow: &[f64]) -> Result<Vec<f64>, SeriesError> {
    ensure_same_len(fast, slow)?;
    Ok(fast
        .iter()
        .zip(slow)
        .map(|(f, s)| event(f > s) - event(f < s))
        .collect())
}

/// Long/flat regime: 1 while fast > slow, else 0.
pub fn long_only_trend(fast: &[f64], slow: &[f64]) -> Result<Vec<f64>, SeriesError> {
    ensure_same_len(fast, slow)?;
    Ok(fast.iter().zip(slow).map(|(f, s)| event(f > s)).collect())
}

#[inline]
fn event(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}
