//! Notifier connection test.

use anyhow::{Context, Result};
use fxsignal_config::AppConfig;

use super::build_notifier;

pub async fn run(config: &AppConfig) -> Result<()> {
    let notifier = build_notifier(config, false)?;
    notifier
        .send_text(&format!("🤖 {} - Connection Test ✅", config.app.bot_name))
        .await
        .with_context(|| format!("{} connection failed", notifier.name()))?;

    println!("Connection test sent via {}", notifier.name());
    Ok(())
}
