//! CLI command implementations.

pub mod analyze;
pub mod scan;
pub mod strategies;
pub mod test_notify;
pub mod validate;
pub mod watch;

use anyhow::{Context, Result};
use fxsignal_config::AppConfig;
use fxsignal_core::traits::Notifier;
use fxsignal_data::CsvDirectoryProvider;
use fxsignal_notify::{FallbackNotifier, LogNotifier, TelegramClient};
use fxsignal_scanner::Scanner;
use fxsignal_strategies::SignalAggregator;
use std::sync::Arc;
use tracing::info;

/// Telegram with format fallback, or a log-only sink for dry runs.
fn build_notifier(config: &AppConfig, dry_run: bool) -> Result<Arc<dyn Notifier>> {
    if dry_run || !config.telegram.enabled {
        info!("Alerts will be logged, not sent");
        return Ok(Arc::new(LogNotifier::new()));
    }
    let telegram = config
        .telegram
        .resolve()
        .context("Telegram credentials missing (or run with --dry-run)")?;
    let client = TelegramClient::new(telegram).context("Failed to create Telegram client")?;
    Ok(Arc::new(
        FallbackNotifier::new(client).with_chart(config.telegram.chart_options()),
    ))
}

fn build_aggregator(config: &AppConfig) -> Result<SignalAggregator> {
    let strategies = config
        .strategies
        .build()
        .context("Invalid strategy configuration")?;
    Ok(SignalAggregator::new(strategies))
}

fn build_scanner(config: &AppConfig, dry_run: bool) -> Result<Scanner> {
    config
        .scanner
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid scanner configuration")?;

    Ok(Scanner::new(
        config.scanner.clone(),
        Arc::new(CsvDirectoryProvider::new(&config.data.dir)),
        build_notifier(config, dry_run)?,
        build_aggregator(config)?,
    )
    .with_bot_name(config.app.bot_name.as_str()))
}
