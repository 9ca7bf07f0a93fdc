//! Single-cycle scan command.

use anyhow::{Context, Result};
use resonance_config::load_config;
use std::path::Path;

use super::{build_engine, load_rules};
use crate::cli::{OutputFormat, ScanArgs};

pub async fn run(args: ScanArgs, config_path: &Path) -> Result<()> {
    let config = load_config(config_path)
        .with_context(|| format!("Failed to load {:?}", config_path))?;
    config.validate().context("Invalid configuration")?;

    let mut engine = build_engine(&config, args.dry_run)?;
    let rules = load_rules(&config);
    let report = engine.run_cycle(&rules).await;

    match args.output {
        OutputFormat::Text => println!("{}", report.summary()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
