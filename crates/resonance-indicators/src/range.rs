//! Daily range and pivot calculations.
//!
//! Both work on daily bars where the last bar is today's (possibly still
//! forming) session and everything before it is complete.

use resonance_core::types::{Bar, BarSeries, PivotLevels, RangeUsage};

/// Trailing window for the average daily range.
pub const ADR_WINDOW: usize = 14;

/// Mean high-low range of up to `window` completed bars before the last one.
///
/// `None` with fewer than 2 bars or a non-positive average.
pub fn average_daily_range(bars: &[Bar], window: usize) -> Option<f64> {
    if bars.len() < 2 || window == 0 {
        return None;
    }

    let completed = &bars[..bars.len() - 1];
    let start = completed.len().saturating_sub(window);
    let recent = &completed[start..];

    let adr = recent.iter().map(Bar::range).sum::<f64>() / recent.len() as f64;
    (adr.is_finite() && adr > 0.0).then_some(adr)
}

/// Today's range as a percentage of the trailing ADR.
pub fn range_usage(daily: &BarSeries) -> Option<RangeUsage> {
    let bars = daily.bars();
    let adr = average_daily_range(bars, ADR_WINDOW)?;
    let today = bars.last()?;

    Some(RangeUsage {
        symbol: daily.symbol.clone(),
        percent_used: today.range() / adr * 100.0,
    })
}

/// Classic floor pivots from the most recently completed daily bar.
pub fn pivot_levels(daily: &BarSeries) -> Option<PivotLevels> {
    if daily.len() < 2 {
        return None;
    }
    let prev = daily.from_end(1)?;

    let pivot = (prev.high + prev.low + prev.close) / 3.0;
    Some(PivotLevels {
        pivot,
        resistance1: 2.0 * pivot - prev.low,
        support1: 2.0 * pivot - prev.high,
    })
}
