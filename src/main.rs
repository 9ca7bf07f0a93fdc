//! Resonance monitor CLI application.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use resonance_config::load_config;
use resonance_monitor::{setup_logging, LogFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The file may be absent or broken (init-config, validate-config);
    // logging still comes up with defaults.
    let logging = load_config(&cli.config).ok().map(|c| c.logging);
    let level = match (cli.log_level, &logging) {
        (Some(level), _) => level.as_str().to_string(),
        (None, Some(l)) => l.level.clone(),
        (None, None) => "info".to_string(),
    };
    let json = cli.json_logs || logging.as_ref().is_some_and(|l| l.format == "json");
    let file = logging.as_ref().and_then(|l| l.file.as_deref());
    let _guard = setup_logging(&level, LogFormat::from_flag(json), file)?;

    // Execute command
    match cli.command {
        Commands::Watch(args) => cli::commands::watch::run(args, &cli.config).await,
        Commands::Scan(args) => cli::commands::scan::run(args, &cli.config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
        Commands::InitConfig(args) => {
            cli::commands::init_config::run(&cli.config, args.force).await
        }
    }
}
