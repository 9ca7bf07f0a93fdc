//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resonance")]
#[command(author, version, about = "Multi-timeframe technical signal resonance monitor")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "RESONANCE_CONFIG")]
    pub config: PathBuf,

    /// Log level; falls back to `logging.level` from the config
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the watch-list until interrupted
    Watch(WatchArgs),
    /// Run a single cycle and print the report
    Scan(ScanArgs),
    /// Validate configuration
    ValidateConfig,
    /// Write a default configuration file
    InitConfig(InitConfigArgs),
}

#[derive(clap::Args)]
pub struct WatchArgs {
    /// Log alerts instead of sending them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct ScanArgs {
    /// Report format
    #[arg(long, default_value = "text")]
    pub output: OutputFormat,

    /// Log alerts instead of sending them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args)]
pub struct InitConfigArgs {
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}
