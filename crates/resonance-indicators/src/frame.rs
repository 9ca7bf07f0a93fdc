//! A bar series with its derived indicator columns.

use resonance_core::error::DataError;
use resonance_core::traits::Indicator;
use resonance_core::types::{Bar, BarSeries};

use crate::momentum::Rsi;
use crate::{ema, macd_histogram, volume_average};

/// Fast trend EMA span.
pub const EMA_FAST: usize = 20;
/// Mid trend EMA span.
pub const EMA_MID: usize = 60;
/// Slow trend EMA span, also the longest window in the frame.
pub const EMA_SLOW: usize = 200;
/// Volume average window.
pub const VOLUME_WINDOW: usize = 20;
/// RSI period.
pub const RSI_PERIOD: usize = 14;

/// One [`BarSeries`] plus aligned indicator columns.
///
/// Columns have exactly one value per bar and are recomputed wholesale on
/// construction; there is no incremental state.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    series: BarSeries,
    ema_fast: Vec<f64>,
    ema_mid: Vec<f64>,
    ema_slow: Vec<f64>,
    volume_avg: Vec<f64>,
    macd_hist: Vec<f64>,
    rsi: Vec<f64>,
}

impl IndicatorFrame {
    /// Compute every column for `series`.
    pub fn new(series: BarSeries) -> Self {
        let closes = series.closes();
        let volumes = series.volumes();

        Self {
            ema_fast: ema(&closes, EMA_FAST),
            ema_mid: ema(&closes, EMA_MID),
            ema_slow: ema(&closes, EMA_SLOW),
            volume_avg: volume_average(&volumes, VOLUME_WINDOW),
            macd_hist: macd_histogram(&closes),
            rsi: Rsi::new(RSI_PERIOD).calculate(&closes),
            series,
        }
    }

    /// The underlying bars.
    pub fn series(&self) -> &BarSeries {
        &self.series
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// The history exceeds the slow EMA window, so trend columns are valid.
    pub fn is_trend_valid(&self) -> bool {
        self.series.len() > EMA_SLOW
    }

    /// Reject frames too short for the trend filter.
    pub fn ensure_sufficient(&self) -> Result<(), DataError> {
        if self.is_trend_valid() {
            Ok(())
        } else {
            Err(DataError::InsufficientHistory {
                required: EMA_SLOW + 1,
                available: self.series.len(),
            })
        }
    }

    /// Last bar.
    pub fn last_bar(&self) -> Option<&Bar> {
        self.series.last()
    }

    pub fn ema_fast(&self) -> &[f64] {
        &self.ema_fast
    }

    pub fn ema_mid(&self) -> &[f64] {
        &self.ema_mid
    }

    pub fn ema_slow(&self) -> &[f64] {
        &self.ema_slow
    }

    /// Trailing volume mean; NaN where the window is incomplete.
    pub fn volume_avg(&self) -> &[f64] {
        &self.volume_avg
    }

    pub fn macd_histogram(&self) -> &[f64] {
        &self.macd_hist
    }

    /// RSI column; NaN for the first `RSI_PERIOD` bars.
    pub fn rsi(&self) -> &[f64] {
        &self.rsi
    }

    /// Latest RSI when defined.
    pub fn last_rsi(&self) -> Option<f64> {
        self.rsi.last().copied().filter(|v| v.is_finite())
    }

    /// Percent change of the last close against the previous close.
    pub fn percent_change(&self) -> Option<f64> {
        let last = self.series.from_end(0)?;
        let prev = self.series.from_end(1)?;
        if prev.close == 0.0 {
            return Some(0.0);
        }
        Some((last.close - prev.close) / prev.close * 100.0)
    }

    /// Last volume over its trailing average; 1.0 (neutral) when undefined.
    pub fn volume_ratio(&self) -> f64 {
        let (Some(bar), Some(&avg)) = (self.series.last(), self.volume_avg.last()) else {
            return 1.0;
        };
        if avg.is_finite() && avg > 0.0 {
            bar.volume / avg
        } else {
            1.0
        }
    }
}
