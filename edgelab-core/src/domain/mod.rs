//! Domain types: bars, bar series, and the series helpers every component shares.

pub mod bar;
pub mod series;

pub use bar::{Bar, BarError, BarSeries};
pub use series::{SeriesError, EPSILON, TRADING_DAYS};
