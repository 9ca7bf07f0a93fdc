//! Validate configuration command.

use anyhow::Result;
use resonance_config::load_config;
use std::path::Path;

use super::load_rules;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };
    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    let rules = load_rules(&config);

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Symbols: {}", config.symbols().join(", "));
    println!(
        "Intervals: {}",
        config
            .watch
            .intervals
            .iter()
            .map(|tf| tf.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("Poll interval: {}s", config.watch.poll_interval_secs);
    println!(
        "Resonance: {} ({})",
        config.resonance.mode,
        config.resonance.mode.description()
    );
    println!(
        "Thresholds: {:.2}% price, {:.2}x volume, K = {}",
        config.signal.price_change_pct, config.signal.volume_ratio, config.signal.reversal_lookback
    );
    println!("Cooldown: {} min", config.alerts.cooldown_minutes);
    println!("Price rules: {}", rules.rules().len());
    for rule in rules.rules() {
        println!("  {}", rule);
    }

    Ok(())
}
