//! Write a default configuration file.

use anyhow::{bail, Context, Result};
use resonance_config::{render_config, AppConfig};
use std::fs;
use std::path::Path;

pub async fn run(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "{:?} already exists; pass --force to overwrite it",
            config_path
        );
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }

    let text = render_config(&AppConfig::default()).context("Failed to render defaults")?;
    fs::write(config_path, text)
        .with_context(|| format!("Failed to write {:?}", config_path))?;

    println!("Wrote default configuration to {:?}", config_path);
    Ok(())
}
