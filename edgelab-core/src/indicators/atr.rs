//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|)
//! ATR uses Wilder smoothing (alpha = 1/period) seeded at TR[0].
//!
//! The close before bar 0 is taken as 0, so TR[0] = high[0] for positive
//! prices. The first smoothed value is dropped; offset: 1.

use super::{wilder, Indicator};
use crate::domain::series::prev;
use crate::domain::BarSeries;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn offset(&self) -> usize {
        1
    }

    fn compute(&self, bars: &BarSeries) -> Vec<f64> {
        atr(&bars.highs(), &bars.lows(), &bars.closes(), self.period)
    }
}

/// True range per bar, using the zero-sentinel previous close.
///
/// Inputs are the columns of one `BarSeries` and so share a length.
pub fn true_range(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    (0..highs.len())
        .map(|i| {
            let (h, l, pc) = (highs[i], lows[i], prev(closes, i));
            (h - l).max((h - pc).abs()).max((l - pc).abs())
        })
        .collect()
}

/// Wilder-smoothed true range with the first value dropped. Length `len - 1`.
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    let smoothed = wilder(&true_range(highs, lows, closes), period);
    smoothed.into_iter().skip(1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn first_true_range_uses_zero_previous_close() {
        let tr = true_range(&[105.0, 106.0], &[95.0, 100.0], &[100.0, 103.0]);
        // |105 - 0| dominates the 10-point range on bar 0.
        assert_approx(tr[0], 105.0, DEFAULT_EPSILON);
        // max(6, |106-100|, |100-100|) = 6
        assert_approx(tr[1], 6.0, DEFAULT_EPSILON);
    }

    #[test]
    fn gap_widens_true_range() {
        // Gap down: prev close 100, bar range 90..92 -> |90 - 100| = 10
        let tr = true_range(&[101.0, 92.0], &[99.0, 90.0], &[100.0, 91.0]);
        assert_approx(tr[1], 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_drops_first_and_smooths() {
        // TR = [105, 6, 6]; alpha = 1/2 -> [105, 55.5, 30.75]; drop first.
        let out = atr(
            &[105.0, 106.0, 106.0],
            &[95.0, 100.0, 100.0],
            &[100.0, 100.0, 100.0],
            2,
        );
        assert_eq!(out.len(), 2);
        assert_approx(out[0], 55.5, DEFAULT_EPSILON);
        assert_approx(out[1], 30.75, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_offset() {
        assert_eq!(Atr::new(14).offset(), 1);
    }
}
