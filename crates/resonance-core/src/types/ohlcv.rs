//! OHLCV (Open, High, Low, Close, Volume) data types.

use serde::{Deserialize, Serialize};

use super::Timeframe;
use crate::error::DataError;

/// Compact OHLCV bar.
/// Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Check that every price and the volume are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }
}

/// Ordered bars for one (symbol, timeframe).
///
/// Timestamps are strictly increasing. Series built from provider output go
/// through [`BarSeries::from_bars`], which rejects anything else.
#[derive(Debug, Clone)]
pub struct BarSeries {
    /// Symbol identifier
    pub symbol: String,
    /// Timeframe of the bars
    pub timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series from untrusted bars, validating the ordering invariant.
    ///
    /// Duplicate or out-of-order timestamps and non-finite values are
    /// reported as [`DataError::Malformed`]; an empty input is
    /// [`DataError::NoDataAvailable`].
    pub fn from_bars(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        bars: Vec<Bar>,
    ) -> Result<Self, DataError> {
        if bars.is_empty() {
            return Err(DataError::NoDataAvailable);
        }

        for (i, bar) in bars.iter().enumerate() {
            if !bar.is_finite() {
                return Err(DataError::Malformed(format!(
                    "non-finite value in bar at {}",
                    bar.timestamp
                )));
            }
            if i > 0 && bar.timestamp <= bars[i - 1].timestamp {
                return Err(DataError::Malformed(format!(
                    "timestamp {} does not follow {}",
                    bar.timestamp,
                    bars[i - 1].timestamp
                )));
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            timeframe,
            bars,
        })
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Get a bar counting back from the newest (0 = last bar).
    pub fn from_end(&self, offset: usize) -> Option<&Bar> {
        self.bars.len().checked_sub(offset + 1).and_then(|i| self.bars.get(i))
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract volumes as a vector.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}
