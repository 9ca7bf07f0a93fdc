//! CSV directory data source.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use resonance_core::error::DataError;
use resonance_core::traits::DataSource;
use resonance_core::types::{Bar, Timeframe};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const DAY_MS: i64 = 86_400_000;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp", alias = "Datetime")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// Reads bars from `{dir}/{SYMBOL}_{interval}.csv`.
///
/// The lookback is measured back from the newest bar in the file, not from
/// the wall clock, so recorded sessions replay the same way every time.
pub struct CsvDataSource {
    dir: PathBuf,
}

impl CsvDataSource {
    /// Create a source over an existing directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DataError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(DataError::Internal(format!(
                "CSV data directory not found: {}",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    /// Path of the file backing (symbol, timeframe).
    pub fn file_path(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.dir
            .join(format!("{}_{}.csv", symbol.to_uppercase(), timeframe))
    }
}

#[async_trait]
impl DataSource for CsvDataSource {
    async fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback_days: u32,
    ) -> Result<Vec<Bar>, DataError> {
        let path = self.file_path(symbol, timeframe);
        if !path.exists() {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }

        let bars = read_bars(&path)?;
        let Some(newest) = bars.last().map(|b| b.timestamp) else {
            return Err(DataError::NoDataAvailable);
        };

        let cutoff = newest - i64::from(lookback_days) * DAY_MS;
        let recent: Vec<Bar> = bars.into_iter().filter(|b| b.timestamp > cutoff).collect();
        debug!(symbol, %timeframe, bars = recent.len(), "Loaded CSV bars");

        Ok(recent)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Load all bars from one file, sorted by timestamp.
pub(crate) fn read_bars(path: &Path) -> Result<Vec<Bar>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DataError::ParseError(e.to_string()))?;

    let mut bars = Vec::new();

    for result in reader.deserialize() {
        let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;

        let timestamp = parse_timestamp(&record.date)?;

        bars.push(Bar::new(
            timestamp,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        ));
    }

    bars.sort_by_key(|b| b.timestamp);

    Ok(bars)
}

/// Parse the timestamp formats commonly found in exported bar files.
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.timestamp_millis());
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    for format in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(dt.and_utc().timestamp_millis());
            }
        }
    }

    // Unix timestamp, milliseconds if more than 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}
