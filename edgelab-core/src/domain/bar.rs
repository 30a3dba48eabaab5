//! Bar, the fundamental market data unit, and the ordered series built from it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::series::simple_returns;

/// OHLCV bar for a single asset on a single date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Rejections raised while constructing a [`BarSeries`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("bar {index}: field `{field}` is not finite ({value})")]
    NonFinite {
        index: usize,
        field: &'static str,
        value: f64,
    },
    #[error("bar {index}: high {high} is below low {low}")]
    InvertedRange { index: usize, high: f64, low: f64 },
    #[error("bar {index}: negative volume {volume}")]
    NegativeVolume { index: usize, volume: f64 },
    #[error("bar {index}: date {date} does not come after {previous}")]
    OutOfOrder {
        index: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },
}

impl Bar {
    /// Check the field-level invariants: finite fields, high >= low, volume >= 0.
    pub fn validate(&self, index: usize) -> Result<(), BarError> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(BarError::NonFinite {
                    index,
                    field,
                    value,
                });
            }
        }
        if self.high < self.low {
            return Err(BarError::InvertedRange {
                index,
                high: self.high,
                low: self.low,
            });
        }
        if self.volume < 0.0 {
            return Err(BarError::NegativeVolume {
                index,
                volume: self.volume,
            });
        }
        Ok(())
    }

    /// Typical price (high + low + close) / 3, the VWAP input.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

/// Chronologically ordered, immutable sequence of bars sharing one date index.
///
/// Construction validates every bar and requires strictly increasing dates.
/// Slicing a valid series always yields a valid series, so the windowing
/// helpers are infallible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Bar>", into = "Vec<Bar>")]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self, BarError> {
        for (index, bar) in bars.iter().enumerate() {
            bar.validate(index)?;
            if index > 0 && bar.date <= bars[index - 1].date {
                return Err(BarError::OutOfOrder {
                    index,
                    date: bar.date,
                    previous: bars[index - 1].date,
                });
            }
        }
        Ok(Self { bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Close-to-close simple returns. One shorter than the series: entry `i`
    /// is the return realized at bar `i + 1`.
    pub fn close_returns(&self) -> Vec<f64> {
        simple_returns(&self.closes())
    }

    /// Sub-series over the bar index range `[start, end)`, clamped to bounds.
    pub fn slice(&self, start: usize, end: usize) -> BarSeries {
        let end = end.min(self.bars.len());
        let start = start.min(end);
        BarSeries {
            bars: self.bars[start..end].to_vec(),
        }
    }

    /// The first `len` bars (or all of them if the series is shorter).
    pub fn truncate_to(&self, len: usize) -> BarSeries {
        self.slice(0, len)
    }
}

impl TryFrom<Vec<Bar>> for BarSeries {
    type Error = BarError;

    fn try_from(bars: Vec<Bar>) -> Result<Self, Self::Error> {
        BarSeries::new(bars)
    }
}

impl From<BarSeries> for Vec<Bar> {
    fn from(series: BarSeries) -> Self {
        series.bars
    }
}
