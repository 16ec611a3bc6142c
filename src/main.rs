//! Signal scanner CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use fxsignal_config::{load_config_or_default, AppConfig, ConfigError};
use fxsignal_monitor::setup_logging;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = load_config_or_default(&cli.config);

    // Setup logging
    let (level, json, file) = match &loaded {
        Ok(config) => (
            cli.log_level
                .map(|l| l.as_str().to_string())
                .unwrap_or_else(|| config.logging.level.clone()),
            cli.json_logs || config.logging.is_json(),
            config.logging.file.clone(),
        ),
        Err(_) => (
            cli.log_level.map_or("info", |l| l.as_str()).to_string(),
            cli.json_logs,
            None,
        ),
    };
    let _guard = setup_logging(&level, json, file.as_deref());

    // Execute command
    match cli.command {
        Commands::Scan(args) => {
            cli::commands::scan::run(args, &require(loaded, &cli.config)?).await
        }
        Commands::Watch(args) => {
            cli::commands::watch::run(args, &require(loaded, &cli.config)?).await
        }
        Commands::Analyze(args) => {
            cli::commands::analyze::run(args, &require(loaded, &cli.config)?).await
        }
        Commands::TestNotify => {
            cli::commands::test_notify::run(&require(loaded, &cli.config)?).await
        }
        Commands::Strategies => cli::commands::strategies::run().await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}

fn require(loaded: Result<AppConfig, ConfigError>, path: &Path) -> Result<AppConfig> {
    loaded.with_context(|| format!("Failed to load configuration from {}", path.display()))
}
