//! Daily range usage, pivot levels and the market backdrop.
//!
//! None of these gate a signal; they only enrich the alert text and the
//! cycle report.

use resonance_core::types::{BarSeries, MarketContext, PivotLevels, RangeUsage};
use resonance_indicators::{pivot_levels, range_usage};
use serde::{Deserialize, Serialize};

/// Range usage and pivots for one symbol, each independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeAndLevelDiagnostics {
    pub range_usage: Option<RangeUsage>,
    pub pivots: Option<PivotLevels>,
}

impl RangeAndLevelDiagnostics {
    /// Compute from a daily series whose last bar is today.
    pub fn from_daily(daily: &BarSeries) -> Self {
        Self {
            range_usage: range_usage(daily),
            pivots: pivot_levels(daily),
        }
    }

    pub fn percent_used(&self) -> Option<f64> {
        self.range_usage.as_ref().map(|u| u.percent_used)
    }

    /// One-line summary, e.g. `ADR 62% (consuming) | P 105.00 R1 110.00 S1 100.00`.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(usage) = &self.range_usage {
            parts.push(format!("ADR {:.0}% ({})", usage.percent_used, usage.band()));
        }
        if let Some(p) = &self.pivots {
            parts.push(format!(
                "P {:.2} R1 {:.2} S1 {:.2}",
                p.pivot, p.resistance1, p.support1
            ));
        }
        if parts.is_empty() {
            "diagnostics unavailable".to_string()
        } else {
            parts.join(" | ")
        }
    }
}

/// Volatility index level and benchmark daily change from recent daily bars.
///
/// `None` when either series has fewer than the bars required or the
/// benchmark's previous close is zero.
pub fn market_context(volatility: &BarSeries, benchmark: &BarSeries) -> Option<MarketContext> {
    let level = volatility.last()?.close;
    let [.., prev, last] = benchmark.bars() else {
        return None;
    };
    if prev.close == 0.0 || !level.is_finite() {
        return None;
    }
    let change = (last.close - prev.close) / prev.close * 100.0;
    Some(MarketContext::new(
        volatility.symbol.as_str(),
        level,
        benchmark.symbol.as_str(),
        change,
    ))
}
