//! Loss circuit breaker.
//!
//! For i >= n, if sum(returns[i-n+1..=i]) < thresh the breaker trips and the
//! position is forced flat for n bars starting at bar i. A trip while already
//! cooling down restarts the countdown at n, so overlapping trips extend the
//! flat period.

use tracing::debug;

use crate::domain::series::ensure_same_len;
use crate::domain::SeriesError;
use crate::indicators::prefix_sums;

/// Cooldown countdown carried across one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CircuitBreakerState {
    pub remaining: usize,
}

impl CircuitBreakerState {
    /// Advance one bar; returns true while the position must be flat.
    pub fn step(&mut self, tripped: bool, cooldown: usize) -> bool {
        if tripped {
            self.remaining = cooldown;
        }
        if self.remaining > 0 {
            self.remaining -= 1;
            true
        } else {
            false
        }
    }
}

pub fn circuit_breaker(
    lookback: usize,
    thresh: f64,
    positions: &[f64],
    returns: &[f64],
) -> Result<Vec<f64>, SeriesError> {
    ensure_same_len(positions, returns)?;
    if lookback == 0 {
        return Err(SeriesError::InvalidWindow {
            window: lookback,
            len: returns.len(),
        });
    }
    let sums = prefix_sums(returns);
    let mut state = CircuitBreakerState::default();
    let mut trips = 0usize;
    let out: Vec<f64> = positions
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let tripped = i >= lookback && sums[i + 1] - sums[i + 1 - lookback] < thresh;
            if tripped {
                trips += 1;
                debug!(bar = i, lookback, thresh, "circuit breaker tripped");
            }
            if state.step(tripped, lookback) {
                0.0
            } else {
                *p
            }
        })
        .collect();
    if trips > 0 {
        debug!(trips, "circuit breaker pass complete");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trip_flattens_n_bars_from_trigger() {
        // n = 2: bar 2 window [-0.03, -0.04] sums to -0.07 < -0.05.
        let r = [0.0, -0.03, -0.04, 0.01, 0.01, 0.01];
        let out = circuit_breaker(2, -0.05, &[1.0; 6], &r).unwrap();
        assert_eq!(out, vec![1.0, 1.0, 0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn no_evaluation_before_lookback() {
        // Bar 1 window would sum to -0.2 but i < n.
        let r = [-0.1, -0.1, 0.3];
        let out = circuit_breaker(2, -0.05, &[1.0; 3], &r).unwrap();
        assert_eq!(out, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn overlapping_trips_extend() {
        let r = [0.0, 0.0, -0.1, -0.1, 0.0, 0.0, 0.0, 0.0];
        let out = circuit_breaker(2, -0.05, &[1.0; 8], &r).unwrap();
        // trips at 2, 3 (sum -0.2), 4 (sum -0.1); last trip covers 4..=5
        assert_eq!(out, vec![1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn state_machine_counts_down() {
        let mut s = CircuitBreakerState::default();
        assert!(s.step(true, 2));
        assert!(s.step(false, 2));
        assert!(!s.step(false, 2));
    }

    #[test]
    fn rejects_zero_lookback() {
        assert!(circuit_breaker(0, -0.05, &[1.0], &[0.0]).is_err());
    }
}
