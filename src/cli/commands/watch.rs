//! Interval scan command.

use anyhow::{Context, Result};
use fxsignal_config::AppConfig;
use std::time::Duration;
use tracing::info;

use super::build_scanner;
use crate::cli::WatchArgs;

pub async fn run(args: WatchArgs, config: &AppConfig) -> Result<()> {
    let scanner = build_scanner(config, args.dry_run)?;
    let interval = args
        .interval_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| scanner.config().interval());
    if interval.is_zero() {
        anyhow::bail!("--interval-secs must be greater than 0");
    }

    let bot = &config.app.bot_name;
    scanner
        .notifier()
        .send_text(&format!("🤖 {} - Connection Test ✅", bot))
        .await
        .context("Notifier connection test failed")?;

    info!(
        interval_secs = interval.as_secs(),
        "{} is running, press Ctrl+C to stop", bot
    );
    scanner.run(interval).await;

    let summary = scanner.tracker().summary();
    info!(
        alerts = summary.total,
        delivered = summary.delivered,
        "{} stopped",
        bot
    );
    Ok(())
}
