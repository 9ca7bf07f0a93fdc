//! CLI command implementations.

pub mod init_config;
pub mod scan;
pub mod validate;
pub mod watch;

use anyhow::{Context, Result};
use resonance_alerts::{AlertCache, AlertDispatcher, LogNotifier, TelegramNotifier};
use resonance_config::{AppConfig, NotifierKind, SourceKind};
use resonance_core::traits::{Clock, DataSource, Notifier, SystemClock};
use resonance_data::{CsvDataSource, YahooDataSource};
use resonance_engine::{Engine, EngineConfig, MarketSymbols};
use resonance_signals::PriceLevelWatcher;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Map file settings onto the engine's view of them.
pub fn engine_config(config: &AppConfig) -> EngineConfig {
    EngineConfig {
        symbols: config.symbols(),
        intervals: config.watch.intervals.clone(),
        signal: config.signal.clone(),
        resonance: config.resonance.mode,
        fetch_timeout: Duration::from_secs(config.data.fetch_timeout_secs),
        lookback_days: config.watch.lookback_days,
        market: config.market.enabled.then(|| MarketSymbols {
            volatility: config.market.volatility_symbol.clone(),
            benchmark: config.market.benchmark_symbol.clone(),
        }),
    }
}

fn data_source(config: &AppConfig) -> Result<Arc<dyn DataSource>> {
    let timeout = Duration::from_secs(config.data.fetch_timeout_secs);
    let source: Arc<dyn DataSource> = match config.data.source {
        SourceKind::Yahoo => Arc::new(
            YahooDataSource::new(&config.data.yahoo_url, timeout)
                .context("Failed to build Yahoo client")?,
        ),
        SourceKind::Csv => Arc::new(
            CsvDataSource::new(config.data.csv_dir.clone())
                .with_context(|| format!("Bad CSV directory {:?}", config.data.csv_dir))?,
        ),
    };
    Ok(source)
}

fn notifier(config: &AppConfig, dry_run: bool) -> Result<Box<dyn Notifier>> {
    if dry_run || config.alerts.notifier == NotifierKind::Log {
        return Ok(Box::new(LogNotifier));
    }
    let notifier = TelegramNotifier::from_env(
        &config.alerts.telegram_url,
        &config.alerts.bot_token_env,
        &config.alerts.chat_id_env,
        Duration::from_secs(config.alerts.send_timeout_secs),
    )
    .context("Telegram is not configured (use --dry-run to log alerts instead)")?;
    Ok(Box::new(notifier))
}

fn cooldown(config: &AppConfig) -> Result<chrono::Duration> {
    chrono::Duration::try_minutes(config.alerts.cooldown_minutes).with_context(|| {
        format!(
            "Cooldown of {} minutes is out of range",
            config.alerts.cooldown_minutes
        )
    })
}

/// Push reloaded alert timing into a running dispatcher. Cooldown entries
/// already recorded are kept.
pub fn apply_alert_settings(dispatcher: &mut AlertDispatcher, config: &AppConfig) -> Result<()> {
    dispatcher.set_cooldown(cooldown(config)?);
    dispatcher.set_send_timeout(Duration::from_secs(config.alerts.send_timeout_secs));
    Ok(())
}

/// Wire an engine from validated settings.
pub fn build_engine(config: &AppConfig, dry_run: bool) -> Result<Engine> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let notifier = notifier(config, dry_run)?;
    info!(
        source = ?config.data.source,
        notifier = notifier.name(),
        mode = %config.resonance.mode,
        "Engine configured"
    );

    let dispatcher = AlertDispatcher::new(
        notifier,
        clock.clone(),
        AlertCache::new(cooldown(config)?),
        Duration::from_secs(config.alerts.send_timeout_secs),
    );

    Ok(Engine::new(
        engine_config(config),
        data_source(config)?,
        dispatcher,
        clock,
    ))
}

/// Inline rules plus the rules file, if any. An unreadable file only loses
/// its own rules.
pub fn load_rules(config: &AppConfig) -> PriceLevelWatcher {
    let mut text = config.watch.price_alerts.clone();
    if let Some(path) = &config.watch.price_alerts_file {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                text.push('\n');
                text.push_str(&contents);
            }
            Err(e) => warn!(path = ?path, error = %e, "Price alert file unreadable"),
        }
    }
    PriceLevelWatcher::from_text(&text)
}
