//! IndicatorEngine: pure functions from a bar series to derived series.
//!
//! Every indicator is available both as a free function over slices and as an
//! [`Indicator`] implementation over a [`BarSeries`]. Windowed indicators drop
//! their warm-up positions instead of padding them: the output is shorter than
//! the input by exactly `offset()`, and `output[i]` belongs to bar
//! `i + offset()`. Callers combining series must track that offset.
//!
//! Two boundary conventions are deliberate and shared with the signal layer:
//! ATR and OBV treat the close before bar 0 as 0 (see [`crate::domain::series::prev`]).

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod obv;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod vwap;
pub mod wilder;

pub use atr::{atr, true_range, Atr};
pub use bollinger::{bollinger, Bollinger, BollingerBand, BollingerBands};
pub use ema::{ema, smooth, Ema};
pub use obv::{obv, Obv};
pub use rsi::{rsi, Rsi};
pub use sma::{moving_average, prefix_sums, Sma};
pub use stochastic::{stochastic_k, Stochastic};
pub use vwap::{vwap, Vwap};
pub use wilder::wilder;

use crate::domain::BarSeries;

/// A derived series computed from a whole bar series.
///
/// # Look-ahead contamination guard
/// No output attributed to bar t may depend on bar t+1 or later. Computing
/// over a truncated series must reproduce the prefix of the full output.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "atr_14").
    fn name(&self) -> &str;

    /// Number of leading bars with no output.
    fn offset(&self) -> usize;

    /// Compute the indicator. Output length is `bars.len() - offset()`,
    /// or empty when the series is shorter than the offset.
    fn compute(&self, bars: &BarSeries) -> Vec<f64>;
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> BarSeries {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect();
    BarSeries::new(bars).unwrap()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
