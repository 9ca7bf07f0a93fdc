//! Signal evaluation for the resonance engine.
//!
//! This crate provides:
//! - Per-interval signal classification (threshold, breakout, MACD reversal)
//! - Resonance policies combining intervals into one verdict
//! - Range usage, pivot and market-context diagnostics
//! - Free-text price-level rules

mod classifier;
mod diagnostics;
mod price_level;
mod resonance;

pub use classifier::{
    detect_breakout, detect_macd_reversal, trend_state, SignalClassifier, SignalConfig, Trigger,
    BREAKOUT_WINDOW, REVERSAL_LOOKBACK_RANGE,
};
pub use diagnostics::{market_context, RangeAndLevelDiagnostics};
pub use price_level::{parse_rule, parse_rules, PriceLevelWatcher};
pub use resonance::{ResonanceAggregator, ResonanceMode};
