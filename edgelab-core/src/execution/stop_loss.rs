//! Fixed-percentage stop-loss simulation over open-to-close bars.
//!
//! Long positions only. Per bar with input position p:
//! - p > 0 and the previous input was flat (or this is bar 0): arm the stop
//!   at `entry = open`. A flip straight from short to long leaves the stop
//!   unarmed.
//! - armed and `low < entry * (1 - pct)`: the stop fills at the stop price,
//!   the bar's return becomes `(stop - open) / open`, and the stop disarms
//!   until the input position goes flat again.
//! - otherwise the bar earns `(close - open) / open`.
//! - p <= 0 resets the state.
//!
//! The strategy return is `p * bar_return`: the triggering bar is still scaled
//! by the pre-trigger position size.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::series::ensure_same_len;
use crate::domain::{BarSeries, SeriesError};

/// Per-run stop state. Reset to `{0, false}` whenever the position is flat.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StopLossState {
    pub entry_price: f64,
    pub triggered: bool,
}

impl StopLossState {
    fn reset(&mut self) {
        *self = Self::default();
    }

    fn is_armed(&self) -> bool {
        self.entry_price > 0.0 && !self.triggered
    }
}

/// Result of one stop-loss pass. Every vector has the input length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopLossOutcome {
    /// True on bars where the stop filled.
    pub triggered: Vec<bool>,
    /// Open-to-close return per bar, replaced by the stop return on trigger bars.
    pub bar_returns: Vec<f64>,
    /// `position * bar_return`.
    pub strategy_returns: Vec<f64>,
    /// Input positions with each trigger bar set to flat.
    pub positions: Vec<f64>,
}

impl StopLossOutcome {
    pub fn trigger_count(&self) -> usize {
        self.triggered.iter().filter(|t| **t).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopLoss {
    pct: f64,
}

impl StopLoss {
    pub fn new(pct: f64) -> Self {
        assert!(pct > 0.0 && pct < 1.0, "stop pct must be in (0, 1)");
        Self { pct }
    }

    pub fn pct(&self) -> f64 {
        self.pct
    }

    pub fn stop_price(&self, entry_price: f64) -> f64 {
        entry_price * (1.0 - self.pct)
    }

    pub fn simulate(
        &self,
        positions: &[f64],
        bars: &BarSeries,
    ) -> Result<StopLossOutcome, SeriesError> {
        let opens = bars.opens();
        ensure_same_len(positions, &opens)?;

        let n = positions.len();
        let mut state = StopLossState::default();
        let mut outcome = StopLossOutcome {
            triggered: vec![false; n],
            bar_returns: Vec::with_capacity(n),
            strategy_returns: Vec::with_capacity(n),
            positions: positions.to_vec(),
        };

        for (i, bar) in bars.bars().iter().enumerate() {
            let p = positions[i];
            let mut bar_return = (bar.close - bar.open) / bar.open;

            if p > 0.0 {
                if i == 0 || positions[i - 1] == 0.0 {
                    state.entry_price = bar.open;
                    state.triggered = false;
                }
                if state.is_armed() {
                    let stop = self.stop_price(state.entry_price);
                    if bar.low < stop {
                        bar_return = (stop - bar.open) / bar.open;
                        outcome.triggered[i] = true;
                        outcome.positions[i] = 0.0;
                        state.entry_price = 0.0;
                        state.triggered = true;
                        debug!(bar = i, stop, low = bar.low, "stop-loss triggered");
                    }
                }
            } else {
                state.reset();
            }

            outcome.bar_returns.push(bar_return);
            outcome.strategy_returns.push(p * bar_return);
        }

        Ok(outcome)
    }
}
