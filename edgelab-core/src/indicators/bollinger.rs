//! Bollinger Bands: moving average +/- k population standard deviations.
//!
//! Three bands (separate Indicator instances):
//! - Middle: SMA(close, period)
//! - Upper: middle + k * stddev(close, period)
//! - Lower: middle - k * stddev(close, period)
//!
//! Uses population stddev (divide by N).
//! Offset: period - 1.

use super::{moving_average, Indicator};
use crate::domain::series::population_std;
use crate::domain::BarSeries;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    k: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    fn with_band(period: usize, k: f64, band: BollingerBand) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        let label = match band {
            BollingerBand::Upper => "upper",
            BollingerBand::Middle => "middle",
            BollingerBand::Lower => "lower",
        };
        Self {
            period,
            k,
            band,
            name: format!("bollinger_{label}_{period}_{k}"),
        }
    }

    pub fn upper(period: usize, k: f64) -> Self {
        Self::with_band(period, k, BollingerBand::Upper)
    }

    pub fn middle(period: usize, k: f64) -> Self {
        Self::with_band(period, k, BollingerBand::Middle)
    }

    pub fn lower(period: usize, k: f64) -> Self {
        Self::with_band(period, k, BollingerBand::Lower)
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn offset(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &BarSeries) -> Vec<f64> {
        let bands = bollinger(&bars.closes(), self.period, self.k);
        match self.band {
            BollingerBand::Upper => bands.upper,
            BollingerBand::Middle => bands.middle,
            BollingerBand::Lower => bands.lower,
        }
    }
}

/// All three bands over the same trailing windows.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn bollinger(values: &[f64], period: usize, k: f64) -> BollingerBands {
    let middle = moving_average(values, period);
    let widths: Vec<f64> = if middle.is_empty() {
        Vec::new()
    } else {
        values
            .windows(period)
            .map(|w| k * population_std(w))
            .collect()
    };
    let upper = middle.iter().zip(&widths).map(|(m, w)| m + w).collect();
    let lower = middle.iter().zip(&widths).map(|(m, w)| m - w).collect();
    BollingerBands {
        upper,
        middle,
        lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn bands_known_values() {
        // Window [2, 4, 4, 4, 5, 5, 7, 9]: mean 5, population std 2.
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let bands = bollinger(&values, 8, 2.0);
        assert_eq!(bands.middle.len(), 1);
        assert_approx(bands.middle[0], 5.0, DEFAULT_EPSILON);
        assert_approx(bands.upper[0], 9.0, DEFAULT_EPSILON);
        assert_approx(bands.lower[0], 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn constant_series_collapses_bands() {
        let bands = bollinger(&[50.0; 10], 4, 2.0);
        assert_eq!(bands.upper.len(), 7);
        for i in 0..7 {
            assert_approx(bands.upper[i], 50.0, DEFAULT_EPSILON);
            assert_approx(bands.lower[i], 50.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn indicator_selects_band() {
        let bars = make_bars(&[10.0, 12.0, 11.0, 13.0, 12.0]);
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        let middle = Bollinger::middle(3, 2.0).compute(&bars);
        let lower = Bollinger::lower(3, 2.0).compute(&bars);
        for i in 0..3 {
            assert!(upper[i] >= middle[i] && middle[i] >= lower[i]);
            assert_approx(upper[i] - middle[i], middle[i] - lower[i], DEFAULT_EPSILON);
        }
        assert_eq!(Bollinger::upper(20, 2.0).name(), "bollinger_upper_20_2");
    }

    #[test]
    fn short_input_yields_empty_bands() {
        let bands = bollinger(&[1.0, 2.0], 5, 2.0);
        assert!(bands.upper.is_empty() && bands.lower.is_empty());
    }
}
