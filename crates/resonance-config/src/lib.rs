//! Configuration management.

mod settings;

pub use settings::{
    AlertSettings, AppConfig, AppSettings, DataSettings, LoggingConfig, MarketSettings,
    NotifierKind, ResonanceSettings, SourceKind, WatchSettings, MAX_COOLDOWN_MINUTES,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Prefix for environment overrides, e.g. `RESONANCE__WATCH__POLL_INTERVAL_SECS`.
pub const ENV_PREFIX: &str = "RESONANCE";

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("watch.symbols")
                .with_list_parse_key("watch.intervals"),
        )
        .build()?;

    config.try_deserialize()
}

/// Render a configuration as TOML.
pub fn render_config(config: &AppConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(config)
}
