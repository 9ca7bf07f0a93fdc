//! Continuous watch loop.

use anyhow::{Context, Result};
use resonance_config::{load_config, AppConfig};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{apply_alert_settings, build_engine, engine_config, load_rules};
use crate::cli::WatchArgs;

/// Re-read the config file; a broken edit keeps the previous settings.
fn reload(config_path: &Path, current: &AppConfig) -> AppConfig {
    match load_config(config_path) {
        Ok(config) => match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!(error = %e, "Reloaded configuration invalid, keeping previous");
                current.clone()
            }
        },
        Err(e) => {
            warn!(error = %e, "Configuration reload failed, keeping previous");
            current.clone()
        }
    }
}

pub async fn run(args: WatchArgs, config_path: &Path) -> Result<()> {
    let mut config = load_config(config_path)
        .with_context(|| format!("Failed to load {:?}", config_path))?;
    config.validate().context("Invalid configuration")?;

    let mut engine = build_engine(&config, args.dry_run)?;
    info!(
        notifier = engine.dispatcher().notifier_name(),
        poll_secs = config.watch.poll_interval_secs,
        "Watching; press Ctrl-C to stop"
    );

    // One listener for the whole loop, so a Ctrl-C that lands mid-cycle is
    // seen at the next pause.
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut cycle: u64 = 0;
    loop {
        if cycle > 0 {
            config = reload(config_path, &config);
            engine.update_config(engine_config(&config));
            if let Err(e) = apply_alert_settings(engine.dispatcher_mut(), &config) {
                warn!(error = %e, "Alert settings not applied");
            }
        }
        cycle += 1;

        let rules = load_rules(&config);
        let report = engine.run_cycle(&rules).await;
        debug!("\n{}", report.summary());
        for symbol in report.directional() {
            info!(
                cycle,
                symbol = %symbol.symbol,
                verdict = %symbol.verdict.label(),
                "Resonance verdict"
            );
        }

        let pause = Duration::from_secs(config.watch.poll_interval_secs);
        tokio::select! {
            _ = tokio::time::sleep(pause) => {}
            _ = &mut ctrl_c => {
                info!(cycles = cycle, "Interrupted, stopping");
                break;
            }
        }
    }

    Ok(())
}
