//! Drawdown tracking and drawdown-based de-risking.
//!
//! equity = cumprod(1 + r), peak = running max(equity),
//! drawdown = (equity - peak) / peak, always <= 0.

use crate::domain::series::ensure_same_len;
use crate::domain::SeriesError;

/// Running peak state carried across one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawdownState {
    pub equity: f64,
    pub peak: f64,
}

impl Default for DrawdownState {
    fn default() -> Self {
        Self {
            equity: 1.0,
            peak: f64::NEG_INFINITY,
        }
    }
}

impl DrawdownState {
    /// Compound one return and return the drawdown after it.
    pub fn step(&mut self, ret: f64) -> f64 {
        self.equity *= 1.0 + ret;
        self.peak = self.peak.max(self.equity);
        (self.equity - self.peak) / self.peak
    }
}

/// Drawdown after each return. The peak starts at the first equity value,
/// so a loss on bar 0 does not register as a drawdown.
pub fn drawdown_series(returns: &[f64]) -> Vec<f64> {
    let mut state = DrawdownState::default();
    returns.iter().map(|r| state.step(*r)).collect()
}

/// Zero the position wherever drawdown falls below `thresh` (a negative level).
pub fn dd_control(
    thresh: f64,
    positions: &[f64],
    returns: &[f64],
) -> Result<Vec<f64>, SeriesError> {
    ensure_same_len(positions, returns)?;
    Ok(positions
        .iter()
        .zip(drawdown_series(returns))
        .map(|(p, dd)| if dd >= thresh { *p } else { 0.0 })
        .collect())
}
