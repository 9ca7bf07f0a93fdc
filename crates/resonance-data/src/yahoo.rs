//! Yahoo Finance chart API data source.

use async_trait::async_trait;
use reqwest::{header, Client};
use resonance_core::error::DataError;
use resonance_core::traits::DataSource;
use resonance_core::types::{Bar, Timeframe};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Public chart endpoint host.
pub const DEFAULT_YAHOO_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) resonance/0.1";

/// Chart API response types
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Bars from the Yahoo chart v8 endpoint.
pub struct YahooDataSource {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl YahooDataSource {
    /// Create a client against `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DataError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }

    /// Interval name understood by the chart endpoint.
    fn interval_param(timeframe: Timeframe) -> &'static str {
        match timeframe {
            Timeframe::Minute1 => "1m",
            Timeframe::Minute5 => "5m",
            Timeframe::Minute15 => "15m",
            Timeframe::Minute30 => "30m",
            Timeframe::Hour1 => "60m",
            Timeframe::Daily => "1d",
        }
    }
}

#[async_trait]
impl DataSource for YahooDataSource {
    async fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback_days: u32,
    ) -> Result<Vec<Bar>, DataError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let params = [
            ("interval", Self::interval_param(timeframe).to_string()),
            ("range", format!("{}d", lookback_days.max(1))),
            ("includePrePost", "false".to_string()),
        ];

        let resp = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DataError::Timeout(self.timeout.as_millis() as u64)
                } else {
                    DataError::ConnectionError(e.to_string())
                }
            })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }
        if !status.is_success() {
            return Err(DataError::ConnectionError(format!("{}: {}", status, body)));
        }

        let bars = parse_chart(symbol, &body)?;
        debug!(symbol, %timeframe, bars = bars.len(), "Fetched chart bars");
        Ok(bars)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

/// Decode a chart response body, dropping rows with a missing price.
fn parse_chart(symbol: &str, body: &str) -> Result<Vec<Bar>, DataError> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| DataError::ParseError(e.to_string()))?;

    if let Some(err) = response.chart.error {
        return Err(if err.code.eq_ignore_ascii_case("Not Found") {
            DataError::SymbolNotFound(symbol.to_string())
        } else {
            DataError::ConnectionError(format!(
                "{}: {}",
                err.code,
                err.description.unwrap_or_default()
            ))
        });
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or(DataError::NoDataAvailable)?;
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let value = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();

    let bars: Vec<Bar> = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let open = value(&quote.open, i)?;
            let high = value(&quote.high, i)?;
            let low = value(&quote.low, i)?;
            let close = value(&quote.close, i)?;
            let volume = value(&quote.volume, i).unwrap_or(0.0);
            Some(Bar::new(ts * 1000, open, high, low, close, volume))
        })
        .collect();

    if bars.is_empty() {
        return Err(DataError::NoDataAvailable);
    }
    Ok(bars)
}
