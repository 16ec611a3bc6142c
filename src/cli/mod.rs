//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use fxsignal_core::types::Timeframe;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fxsignal")]
#[command(author, version, about = "Technical-analysis signal scanner with chat alerts")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "FXSIGNAL_CONFIG")]
    pub config: PathBuf,

    /// Log level (overrides the configured level)
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

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one scan over every configured pair
    Scan(ScanArgs),
    /// Scan repeatedly on a fixed interval until Ctrl-C
    Watch(WatchArgs),
    /// Run all strategies on one series and print the ranked signals
    Analyze(AnalyzeArgs),
    /// List available strategies
    Strategies,
    /// Validate configuration
    ValidateConfig,
    /// Send a connection test message
    TestNotify,
}

#[derive(clap::Args)]
pub struct ScanArgs {
    /// Log alerts instead of sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Save the report as JSON
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct WatchArgs {
    /// Seconds between scans (defaults to scanner.interval_secs)
    #[arg(long)]
    pub interval_secs: Option<u64>,

    /// Log alerts instead of sending them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args)]
pub struct AnalyzeArgs {
    /// Symbol to analyze
    #[arg(short, long, default_value = "EURUSD")]
    pub symbol: String,

    /// Timeframe (15m, 1h, 4h, ...)
    #[arg(short, long, default_value = "1h")]
    pub timeframe: Timeframe,

    /// Data file (CSV); defaults to the configured data directory
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Write a PNG chart of the best signal
    #[arg(long)]
    pub chart: Option<PathBuf>,
}
