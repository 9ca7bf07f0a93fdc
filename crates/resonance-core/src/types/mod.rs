//! Core data types for the resonance engine.

mod alert;
mod diagnostics;
mod ohlcv;
mod signal;
mod timeframe;

pub use alert::{Alert, AlertAction, AlertKey, LevelOperator, PriceLevelRule};
pub use diagnostics::{MarketContext, PivotLevels, RangeBand, RangeUsage, VolatilityRegime};
pub use ohlcv::{Bar, BarSeries};
pub use signal::{Direction, IntervalReasons, ResonanceVerdict, Signal, SignalReason, Trend};
pub use timeframe::Timeframe;
