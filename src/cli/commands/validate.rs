//! Validate configuration command.

use anyhow::Result;
use fxsignal_config::load_config;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };
    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Bot name: {}", config.app.bot_name);
    println!("Log level: {}", config.logging.level);
    println!("Symbols: {}", config.scanner.symbols.join(", "));
    println!(
        "Timeframes: {}",
        config
            .scanner
            .timeframes
            .iter()
            .map(|tf| tf.label())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("Candles per pair: {}", config.scanner.candles);
    println!("Data directory: {}", config.data.dir.display());
    println!("Strategies: {}", config.strategies.enabled.join(", "));
    println!(
        "Telegram: {}",
        if config.telegram.enabled {
            format!(
                "enabled (token from ${}, chat from ${})",
                config.telegram.token_env, config.telegram.chat_id_env
            )
        } else {
            "disabled".to_string()
        }
    );

    Ok(())
}
