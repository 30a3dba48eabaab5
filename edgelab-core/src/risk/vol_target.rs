//! Volatility targeting.
//!
//! scale[i] = signal[i] * target / max(std(returns[i-n..i], ddof=1) * sqrt(252), eps)
//!
//! The window ends at i-1, so bar i is sized only on returns already realized.
//! Unlike the windowed indicators there is no dropped warm-up: for i < n the
//! realized vol is taken as eps and the output is a defined but huge scale.
//! Callers are expected to cap it (see `RiskConfig`).

use crate::domain::series::{ensure_same_len, sample_std};
use crate::domain::{SeriesError, EPSILON, TRADING_DAYS};

pub fn vol_target(
    target: f64,
    signal: &[f64],
    returns: &[f64],
    lookback: usize,
) -> Result<Vec<f64>, SeriesError> {
    ensure_same_len(signal, returns)?;
    if lookback == 0 {
        return Err(SeriesError::InvalidWindow {
            window: lookback,
            len: returns.len(),
        });
    }
    let annualize = TRADING_DAYS.sqrt();
    Ok(signal
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let realized = if i < lookback {
                EPSILON
            } else {
                (sample_std(&returns[i - lookback..i]) * annualize).max(EPSILON)
            };
            s * target / realized
        })
        .collect())
}
