//! Per-interval signal classification.
//!
//! Evaluates the newest bar of an [`IndicatorFrame`] against three
//! independent sub-conditions (trend/volume threshold, 5-bar breakout,
//! MACD exhaustion reversal) and folds them into one [`Signal`].

use resonance_core::error::ResonanceError;
use resonance_core::types::{Direction, Signal, SignalReason, Trend};
use resonance_indicators::IndicatorFrame;
use serde::{Deserialize, Serialize};

/// Bars before the last one that form the breakout window.
pub const BREAKOUT_WINDOW: usize = 5;
/// Allowed MACD reversal lookback.
pub const REVERSAL_LOOKBACK_RANGE: std::ops::RangeInclusive<usize> = 3..=15;

/// Rule configuration for the classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Minimum absolute percent change of the last bar
    pub price_change_pct: f64,
    /// Minimum last-volume / average-volume ratio
    pub volume_ratio: f64,
    /// Enable the 5-bar breakout rule
    pub breakout: bool,
    /// Enable the MACD exhaustion-reversal rule
    pub macd_reversal: bool,
    /// Same-sign histogram bars required before a flip counts
    pub reversal_lookback: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            price_change_pct: 1.0,
            volume_ratio: 1.5,
            breakout: true,
            macd_reversal: true,
            reversal_lookback: 7,
        }
    }
}

impl SignalConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ResonanceError> {
        if !self.price_change_pct.is_finite() || self.price_change_pct < 0.0 {
            return Err(ResonanceError::Config(
                "Price change threshold must be a non-negative number".into(),
            ));
        }
        if !self.volume_ratio.is_finite() || self.volume_ratio < 0.0 {
            return Err(ResonanceError::Config(
                "Volume ratio threshold must be a non-negative number".into(),
            ));
        }
        if !REVERSAL_LOOKBACK_RANGE.contains(&self.reversal_lookback) {
            return Err(ResonanceError::Config(format!(
                "Reversal lookback must be between {} and {}, got {}",
                REVERSAL_LOOKBACK_RANGE.start(),
                REVERSAL_LOOKBACK_RANGE.end(),
                self.reversal_lookback
            )));
        }
        Ok(())
    }
}

/// Bull/bear outcome of one sub-condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Trigger {
    pub bull: bool,
    pub bear: bool,
}

/// EMA-stack trend filter.
///
/// BULL iff close > slow EMA and fast EMA > mid EMA; BEAR is the mirror.
pub fn trend_state(close: f64, ema_fast: f64, ema_mid: f64, ema_slow: f64) -> Trend {
    if close > ema_slow && ema_fast > ema_mid {
        Trend::Bull
    } else if close < ema_slow && ema_fast < ema_mid {
        Trend::Bear
    } else {
        Trend::Sideways
    }
}

/// Close against the high/low extremes of the preceding window.
///
/// `highs` and `lows` are the bars immediately before the bar that closed
/// at `close`.
pub fn detect_breakout(highs: &[f64], lows: &[f64], close: f64) -> Trigger {
    if highs.is_empty() || lows.is_empty() {
        return Trigger::default();
    }
    let max_high = highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_low = lows.iter().copied().fold(f64::INFINITY, f64::min);

    Trigger {
        bull: close > max_high,
        bear: close < min_low,
    }
}

/// Same-sign streak then flip, over exactly the last `lookback + 1` values.
pub fn detect_macd_reversal(histogram: &[f64], lookback: usize) -> Trigger {
    if lookback == 0 || histogram.len() < lookback + 1 {
        return Trigger::default();
    }
    let window = &histogram[histogram.len() - (lookback + 1)..];
    let (streak, last) = window.split_at(lookback);
    let last = last[0];

    Trigger {
        bull: streak.iter().all(|&h| h < 0.0) && last > 0.0,
        bear: streak.iter().all(|&h| h > 0.0) && last < 0.0,
    }
}

/// Classifies one (symbol, interval) frame.
#[derive(Debug, Clone)]
pub struct SignalClassifier {
    config: SignalConfig,
}

impl SignalClassifier {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Classify the newest bar of `frame`.
    ///
    /// Returns NONE with no reasons when the history is `lookback + 1` bars
    /// or shorter.
    pub fn classify(&self, frame: &IndicatorFrame) -> Signal {
        let k = self.config.reversal_lookback;
        let n = frame.len();
        if n <= k + 1 {
            return Signal::none(Trend::Sideways);
        }

        let series = frame.series();
        let bars = series.bars();
        let last = bars[n - 1];

        let trend = if frame.is_trend_valid() {
            trend_state(
                last.close,
                frame.ema_fast()[n - 1],
                frame.ema_mid()[n - 1],
                frame.ema_slow()[n - 1],
            )
        } else {
            Trend::Sideways
        };

        let percent_change = frame.percent_change().unwrap_or(0.0);
        let volume_ratio = frame.volume_ratio();

        let volume_ok = volume_ratio >= self.config.volume_ratio;
        let threshold = Trigger {
            bull: trend == Trend::Bull
                && percent_change >= self.config.price_change_pct
                && volume_ok,
            bear: trend == Trend::Bear
                && percent_change <= -self.config.price_change_pct
                && volume_ok,
        };

        let breakout = if self.config.breakout && n > BREAKOUT_WINDOW {
            let window = &bars[n - 1 - BREAKOUT_WINDOW..n - 1];
            let highs: Vec<f64> = window.iter().map(|b| b.high).collect();
            let lows: Vec<f64> = window.iter().map(|b| b.low).collect();
            detect_breakout(&highs, &lows, last.close)
        } else {
            Trigger::default()
        };

        let reversal = if self.config.macd_reversal {
            detect_macd_reversal(frame.macd_histogram(), k)
        } else {
            Trigger::default()
        };

        let threshold_reason = SignalReason::Threshold {
            percent_change,
            volume_ratio,
        };
        let reversal_reason = SignalReason::MacdReversal { lookback: k };

        // BULL is evaluated first and wins a tie.
        let (direction, fired) = if threshold.bull || breakout.bull || reversal.bull {
            (
                Direction::Bull,
                [threshold.bull, breakout.bull, reversal.bull],
            )
        } else if threshold.bear || breakout.bear || reversal.bear {
            (
                Direction::Bear,
                [threshold.bear, breakout.bear, reversal.bear],
            )
        } else {
            return Signal::none(trend);
        };

        let candidates = [
            threshold_reason,
            SignalReason::Breakout { direction },
            reversal_reason,
        ];
        let reasons = candidates
            .into_iter()
            .zip(fired)
            .filter_map(|(reason, hit)| hit.then_some(reason))
            .collect();

        Signal {
            direction,
            reasons,
            trend,
        }
    }
}
