//! Series helpers shared by every engine component.
//!
//! A series is a plain `&[f64]` aligned to a `BarSeries` index (or a window of
//! it). All boundary handling funnels through [`prev`]: the value before index
//! 0 is the zero sentinel.

use thiserror::Error;

/// Floor applied to degenerate denominators (variance, volume, range).
pub const EPSILON: f64 = 1e-10;

/// Annualization factor for daily bars.
pub const TRADING_DAYS: f64 = 252.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("series length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
    #[error("invalid window {window} for series of length {len}")]
    InvalidWindow { window: usize, len: usize },
}

/// Require two series to be combinable element-wise.
pub fn ensure_same_len(left: &[f64], right: &[f64]) -> Result<(), SeriesError> {
    if left.len() != right.len() {
        return Err(SeriesError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(())
}

/// Previous-value accessor with the zero sentinel at index 0.
#[inline]
pub fn prev(values: &[f64], i: usize) -> f64 {
    if i == 0 {
        0.0
    } else {
        values[i - 1]
    }
}

/// Shift right by one, filling the vacated slot with zero.
pub fn shift_right(values: &[f64]) -> Vec<f64> {
    (0..values.len()).map(|i| prev(values, i)).collect()
}

/// First difference against the shifted series: `x[i] - prev(x, i)`.
/// Same length as the input; the first entry is `x[0]`.
pub fn diff_from_zero(values: &[f64]) -> Vec<f64> {
    (0..values.len()).map(|i| values[i] - prev(values, i)).collect()
}

/// Sign with `sign(0) = 0`.
#[inline]
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Trim both series from the front so they end on the same bar.
pub fn tail_align<'a>(left: &'a [f64], right: &'a [f64]) -> (&'a [f64], &'a [f64]) {
    let n = left.len().min(right.len());
    (&left[left.len() - n..], &right[right.len() - n..])
}

/// Simple returns `(x[i+1] - x[i]) / x[i]`, one shorter than the input.
pub fn simple_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divide by n).
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Sample variance with Bessel's correction. Zero for fewer than two values.
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

pub fn sample_std(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// Equity curve: running product of `(1 + r)`.
pub fn cumulative_product(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |equity, r| {
            *equity *= 1.0 + r;
            Some(*equity)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prev_uses_zero_sentinel() {
        let v = [3.0, 4.0, 5.0];
        assert_eq!(prev(&v, 0), 0.0);
        assert_eq!(prev(&v, 2), 4.0);
        assert_eq!(shift_right(&v), vec![0.0, 3.0, 4.0]);
    }

    #[test]
    fn diff_from_zero_keeps_first_value() {
        assert_eq!(diff_from_zero(&[2.0, 5.0, 4.0]), vec![2.0, 3.0, -1.0]);
        assert!(diff_from_zero(&[]).is_empty());
    }

    #[test]
    fn sign_of_zero_is_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
        assert_eq!(sign(2.5), 1.0);
        assert_eq!(sign(-1e-300), -1.0);
    }

    #[test]
    fn tail_align_keeps_last_bars() {
        let (a, b) = tail_align(&[1.0, 2.0, 3.0, 4.0], &[9.0, 8.0]);
        assert_eq!(a, &[3.0, 4.0]);
        assert_eq!(b, &[9.0, 8.0]);
    }

    #[test]
    fn simple_returns_are_one_shorter() {
        let r = simple_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(r.len(), 2);
        assert!((r[0] - 0.1).abs() < 1e-12);
        assert!((r[1] + 0.1).abs() < 1e-12);
        assert!(simple_returns(&[100.0]).is_empty());
    }

    #[test]
    fn std_conventions() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!((population_std(&v) - 1.25f64.sqrt()).abs() < 1e-12);
        assert!((sample_std(&v) - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(sample_std(&[1.0]), 0.0);
        assert_eq!(population_std(&[]), 0.0);
    }

    #[test]
    fn equity_compounds() {
        let eq = cumulative_product(&[0.10, -0.20, 0.05]);
        assert!((eq[0] - 1.10).abs() < 1e-12);
        assert!((eq[1] - 0.88).abs() < 1e-12);
        assert!((eq[2] - 0.924).abs() < 1e-12);
    }

    #[test]
    fn length_mismatch_reports_both_sides() {
        assert_eq!(
            ensure_same_len(&[1.0], &[1.0, 2.0]),
            Err(SeriesError::LengthMismatch { left: 1, right: 2 })
        );
        assert!(ensure_same_len(&[], &[]).is_ok());
    }
}
