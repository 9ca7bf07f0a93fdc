//! Technical indicators for the resonance engine.
//!
//! This crate provides:
//! - Moving averages (SMA, first-value-seeded EMA)
//! - Momentum indicators (RSI, MACD)
//! - Daily range usage and pivot levels
//! - [`IndicatorFrame`], a bar series with aligned indicator columns
//!
//! All series outputs are aligned with their input; undefined positions
//! are NaN.

pub mod frame;
pub mod momentum;
pub mod moving_average;
pub mod range;

pub use frame::IndicatorFrame;
pub use momentum::{Macd, MacdOutput, Rsi};
pub use moving_average::{Ema, Sma};
pub use range::{average_daily_range, pivot_levels, range_usage};

use resonance_core::traits::Indicator;

/// EMA of `series` with smoothing `2 / (span + 1)`.
pub fn ema(series: &[f64], span: usize) -> Vec<f64> {
    Ema::new(span).calculate(series)
}

/// Trailing mean volume; NaN until `window` values are available.
pub fn volume_average(volumes: &[f64], window: usize) -> Vec<f64> {
    Sma::new(window).calculate(volumes)
}

/// MACD(12, 26, 9) histogram.
pub fn macd_histogram(closes: &[f64]) -> Vec<f64> {
    Macd::new().histogram(closes)
}
