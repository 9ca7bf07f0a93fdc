//! Core types and traits for the resonance engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries, Timeframe)
//! - Signals, resonance verdicts and alert payloads
//! - Range/pivot/market diagnostics
//! - Core traits for indicators, data sources, notifiers and clocks

pub mod types;
pub mod traits;
pub mod error;

pub use error::ResonanceError;
pub use types::*;
pub use traits::*;
