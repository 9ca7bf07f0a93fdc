//! Poll-cycle engine.
//!
//! One [`Engine::run_cycle`] fetches bars for every symbol and interval,
//! classifies, aggregates, attaches diagnostics and hands candidate alerts
//! to the dispatcher. Failures are isolated per symbol and interval.

mod engine;
mod report;

pub use engine::{Engine, EngineConfig, MarketSymbols, DAILY_LOOKBACK_DAYS, MARKET_LOOKBACK_DAYS};
pub use report::{AlertRecord, AlertStatus, CycleReport, IntervalError, IntervalSignal, SymbolReport};
