//! Configuration structures.

use resonance_core::error::ResonanceError;
use resonance_core::types::Timeframe;
use resonance_signals::{ResonanceMode, SignalConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub watch: WatchSettings,
    #[serde(default)]
    pub signal: SignalConfig,
    #[serde(default)]
    pub resonance: ResonanceSettings,
    #[serde(default)]
    pub alerts: AlertSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub market: MarketSettings,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "resonance".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Daily-rotated log file
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Watch-list and cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchSettings {
    pub symbols: Vec<String>,
    /// Fastest first
    pub intervals: Vec<Timeframe>,
    pub poll_interval_secs: u64,
    /// Fixed intraday lookback; per-interval defaults when unset
    pub lookback_days: Option<u32>,
    /// Inline rules, e.g. `TSLA > 400, NVDA crosses down 118`
    pub price_alerts: String,
    /// File of rules, re-read every cycle
    pub price_alerts_file: Option<PathBuf>,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            symbols: ["TSLA", "NVDA", "AAPL", "QQQ", "BTC-USD"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            intervals: vec![Timeframe::Minute5, Timeframe::Minute15],
            poll_interval_secs: 60,
            lookback_days: None,
            price_alerts: String::new(),
            price_alerts_file: None,
        }
    }
}

/// Resonance policy selection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ResonanceSettings {
    pub mode: ResonanceMode,
}

/// Where alerts go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    #[default]
    Telegram,
    Log,
}

/// Alert delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    pub notifier: NotifierKind,
    pub cooldown_minutes: i64,
    pub send_timeout_secs: u64,
    pub telegram_url: String,
    /// Name of the env var holding the bot token
    pub bot_token_env: String,
    /// Name of the env var holding the chat id
    pub chat_id_env: String,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            notifier: NotifierKind::Telegram,
            cooldown_minutes: 30,
            send_timeout_secs: 5,
            telegram_url: "https://api.telegram.org".to_string(),
            bot_token_env: "TELEGRAM_BOT_TOKEN".to_string(),
            chat_id_env: "TELEGRAM_CHAT_ID".to_string(),
        }
    }
}

/// Bar source kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Yahoo,
    Csv,
}

/// Bar source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub source: SourceKind,
    pub yahoo_url: String,
    /// Directory of `{SYMBOL}_{interval}.csv` files
    pub csv_dir: PathBuf,
    pub fetch_timeout_secs: u64,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            source: SourceKind::Yahoo,
            yahoo_url: "https://query1.finance.yahoo.com".to_string(),
            csv_dir: PathBuf::from("data"),
            fetch_timeout_secs: 10,
        }
    }
}

/// Market backdrop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSettings {
    pub enabled: bool,
    pub volatility_symbol: String,
    pub benchmark_symbol: String,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volatility_symbol: "^VIX".to_string(),
            benchmark_symbol: "SPY".to_string(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Longest accepted alert cooldown: one week.
pub const MAX_COOLDOWN_MINUTES: i64 = 7 * 24 * 60;

impl AppConfig {
    /// Check cross-field constraints the types cannot express.
    pub fn validate(&self) -> Result<(), ResonanceError> {
        self.signal.validate()?;

        if self.watch.symbols.iter().all(|s| s.trim().is_empty()) {
            return Err(ResonanceError::Config("Watch-list is empty".into()));
        }
        if self.watch.intervals.is_empty() {
            return Err(ResonanceError::Config("No intervals configured".into()));
        }
        if let Some(tf) = self.watch.intervals.iter().find(|tf| !tf.is_intraday()) {
            return Err(ResonanceError::Config(format!(
                "Interval {} is not intraday; daily bars are fetched for diagnostics only",
                tf
            )));
        }
        let unique: HashSet<_> = self.watch.intervals.iter().collect();
        if unique.len() != self.watch.intervals.len() {
            return Err(ResonanceError::Config("Duplicate interval".into()));
        }
        if self.watch.poll_interval_secs == 0 {
            return Err(ResonanceError::Config(
                "Poll interval must be at least 1 second".into(),
            ));
        }
        if !(0..=MAX_COOLDOWN_MINUTES).contains(&self.alerts.cooldown_minutes) {
            return Err(ResonanceError::Config(format!(
                "Cooldown must be between 0 and {} minutes, got {}",
                MAX_COOLDOWN_MINUTES, self.alerts.cooldown_minutes
            )));
        }
        if self.alerts.send_timeout_secs == 0 || self.data.fetch_timeout_secs == 0 {
            return Err(ResonanceError::Config("Timeouts must be positive".into()));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ResonanceError::Config(format!(
                "Unknown log level: {}",
                self.logging.level
            )));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ResonanceError::Config(format!(
                "Unknown log format: {}",
                self.logging.format
            )));
        }
        Ok(())
    }

    /// Normalised, de-duplicated watch-list.
    pub fn symbols(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.watch
            .symbols
            .iter()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let mut config = AppConfig::default();
        config.signal.reversal_lookback = 20;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.watch.symbols = vec![" ".to_string()];
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.watch.intervals = vec![Timeframe::Minute5, Timeframe::Daily];
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.watch.intervals = vec![Timeframe::Minute5, Timeframe::Minute5];
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.alerts.cooldown_minutes = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cooldown_upper_bound() {
        let mut config = AppConfig::default();
        config.alerts.cooldown_minutes = MAX_COOLDOWN_MINUTES;
        assert!(config.validate().is_ok());

        config.alerts.cooldown_minutes = i64::MAX;
        assert_eq!(
            config.validate().unwrap_err(),
            ResonanceError::Config(format!(
                "Cooldown must be between 0 and {} minutes, got {}",
                MAX_COOLDOWN_MINUTES,
                i64::MAX
            ))
        );
    }

    #[test]
    fn test_symbols_normalised() {
        let mut config = AppConfig::default();
        config.watch.symbols = vec![
            "tsla".to_string(),
            " NVDA ".to_string(),
            "TSLA".to_string(),
            String::new(),
        ];
        assert_eq!(config.symbols(), vec!["TSLA", "NVDA"]);
    }
}
