//! Error types for the resonance engine.

use thiserror::Error;

/// Startup errors. Once the poll loop runs, nothing is fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResonanceError {
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Bar retrieval errors.
///
/// Every variant is recoverable: the engine degrades the affected
/// symbol/interval to "insufficient data" for the cycle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Insufficient history: need {required} bars, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("Malformed bar data: {0}")]
    Malformed(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Data source error: {0}")]
    Internal(String),
}

/// Alert delivery errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotifyError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Delivery timed out after {0} ms")]
    Timeout(u64),

    #[error("Rejected by endpoint: {0}")]
    Rejected(String),
}

/// Price-level rule parse errors. Never surfaced past the watcher.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("Unrecognised rule: {0:?}")]
    Unrecognised(String),

    #[error("Invalid target price: {0:?}")]
    InvalidTarget(String),
}
