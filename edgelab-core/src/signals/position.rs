//! Position-shaping state machines: forward fill and minimum holding period.

/// Hold the last non-zero value forward. `out[0] = input[0]`, even if zero.
pub fn fill(signal: &[f64]) -> Vec<f64> {
    let mut last = 0.0;
    signal
        .iter()
        .map(|&x| {
            if x != 0.0 {
                last = x;
            }
            last
        })
        .collect()
}

/// Minimum-hold state carried across one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HoldState {
    pub position: f64,
    pub remaining: usize,
}

impl HoldState {
    /// Advance one bar with the requested position; returns the held position.
    pub fn step(&mut self, requested: f64, period: usize) -> f64 {
        if self.remaining > 0 {
            self.remaining -= 1;
        } else if requested != self.position {
            // Exits to flat are accepted immediately and carry no hold.
            self.remaining = if requested != 0.0 {
                period.saturating_sub(1)
            } else {
                0
            };
            self.position = requested;
        }
        self.position
    }
}

/// Enforce a minimum holding period of `period` bars on each accepted
/// non-zero position change. `period <= 1` passes the input through.
pub fn hold(positions: &[f64], period: usize) -> Vec<f64> {
    let mut state = HoldState::default();
    positions.iter().map(|&p| state.step(p, period)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_holds_last_nonzero() {
        let out = fill(&[0.0, 1.0, 0.0, 0.0, -1.0, 0.0]);
        assert_eq!(out, vec![0.0, 1.0, 1.0, 1.0, -1.0, -1.0]);
    }

    #[test]
    fn fill_first_value_passes_through() {
        assert_eq!(fill(&[-1.0, 0.0]), vec![-1.0, -1.0]);
        assert!(fill(&[]).is_empty());
    }

    #[test]
    fn hold_forces_repeat_of_entry() {
        // Enter long at bar 1; input flips away at bar 2 but is held for 3 bars.
        let out = hold(&[0.0, 1.0, -1.0, 0.0, 0.0, 0.0], 3);
        assert_eq!(out, vec![0.0, 1.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn hold_accepts_change_after_window() {
        let out = hold(&[1.0, -1.0, -1.0, -1.0, 1.0], 2);
        // bar 0 enter +1 (hold 1 more), bar 1 forced +1, bar 2 accept -1,
        // bar 3 forced -1, bar 4 accept +1
        assert_eq!(out, vec![1.0, 1.0, -1.0, -1.0, 1.0]);
    }

    #[test]
    fn exit_to_flat_has_no_hold() {
        let out = hold(&[1.0, 1.0, 1.0, 0.0, 1.0], 3);
        assert_eq!(out, vec![1.0, 1.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn period_one_or_zero_is_identity() {
        let input = [0.0, 1.0, -1.0, 0.0, 1.0];
        assert_eq!(hold(&input, 1), input.to_vec());
        assert_eq!(hold(&input, 0), input.to_vec());
    }
}
