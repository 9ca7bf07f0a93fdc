//! Range usage, pivot levels and market context.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Presentation band for ADR usage. Never gates a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeBand {
    AmpleRoom,
    Consuming,
    NearExhaustion,
}

impl RangeBand {
    /// Classify a usage percentage.
    pub fn classify(percent_used: f64) -> Self {
        if percent_used < 50.0 {
            RangeBand::AmpleRoom
        } else if percent_used <= 85.0 {
            RangeBand::Consuming
        } else {
            RangeBand::NearExhaustion
        }
    }
}

impl fmt::Display for RangeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RangeBand::AmpleRoom => "ample room",
            RangeBand::Consuming => "consuming",
            RangeBand::NearExhaustion => "near exhaustion, reversal risk",
        };
        write!(f, "{}", s)
    }
}

/// Today's range as a share of the trailing average daily range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeUsage {
    pub symbol: String,
    pub percent_used: f64,
}

impl RangeUsage {
    pub fn band(&self) -> RangeBand {
        RangeBand::classify(self.percent_used)
    }
}

/// Classic floor pivots from the prior completed daily bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PivotLevels {
    pub pivot: f64,
    pub resistance1: f64,
    pub support1: f64,
}

/// Volatility regime derived from the volatility index level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityRegime {
    Calm,
    Elevated,
    Extreme,
}

impl VolatilityRegime {
    pub fn classify(level: f64) -> Self {
        if level > 28.0 {
            VolatilityRegime::Extreme
        } else if level > 20.0 {
            VolatilityRegime::Elevated
        } else {
            VolatilityRegime::Calm
        }
    }
}

impl fmt::Display for VolatilityRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VolatilityRegime::Calm => "calm",
            VolatilityRegime::Elevated => "volatility rising",
            VolatilityRegime::Extreme => "extreme fear",
        };
        write!(f, "{}", s)
    }
}

/// Broad-market backdrop attached to alerts.
///
/// Carries the symbols it was fetched for so labels follow configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    pub volatility_symbol: String,
    pub volatility: f64,
    pub benchmark_symbol: String,
    pub benchmark_change_pct: f64,
    pub regime: VolatilityRegime,
}

impl MarketContext {
    pub fn new(
        volatility_symbol: impl Into<String>,
        volatility: f64,
        benchmark_symbol: impl Into<String>,
        benchmark_change_pct: f64,
    ) -> Self {
        Self {
            volatility_symbol: volatility_symbol.into(),
            volatility,
            benchmark_symbol: benchmark_symbol.into(),
            benchmark_change_pct,
            regime: VolatilityRegime::classify(volatility),
        }
    }
}

/// `VIX 18.20 (calm) | SPY +0.45%`; a leading `^` index marker is dropped.
impl fmt::Display for MarketContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.2} ({}) | {} {:+.2}%",
            self.volatility_symbol.trim_start_matches('^'),
            self.volatility,
            self.regime,
            self.benchmark_symbol,
            self.benchmark_change_pct
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bands() {
        assert_eq!(RangeBand::classify(10.0), RangeBand::AmpleRoom);
        assert_eq!(RangeBand::classify(49.99), RangeBand::AmpleRoom);
        assert_eq!(RangeBand::classify(50.0), RangeBand::Consuming);
        assert_eq!(RangeBand::classify(85.0), RangeBand::Consuming);
        assert_eq!(RangeBand::classify(85.1), RangeBand::NearExhaustion);
        assert_eq!(
            RangeBand::NearExhaustion.to_string(),
            "near exhaustion, reversal risk"
        );
    }

    #[test]
    fn test_volatility_regime() {
        let regime = |level: f64| MarketContext::new("^VIX", level, "SPY", 0.0).regime;
        assert_eq!(regime(15.0), VolatilityRegime::Calm);
        assert_eq!(regime(20.0), VolatilityRegime::Calm);
        assert_eq!(regime(24.0), VolatilityRegime::Elevated);
        assert_eq!(regime(31.5), VolatilityRegime::Extreme);
    }

    #[test]
    fn test_market_context_label_uses_symbols() {
        assert_eq!(
            MarketContext::new("^VIX", 18.2, "SPY", 0.45).to_string(),
            "VIX 18.20 (calm) | SPY +0.45%"
        );
        assert_eq!(
            MarketContext::new("^VXN", 24.0, "QQQ", -1.234).to_string(),
            "VXN 24.00 (volatility rising) | QQQ -1.23%"
        );
    }
}
