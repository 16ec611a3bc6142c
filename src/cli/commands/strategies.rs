//! List strategies command.

use anyhow::Result;
use fxsignal_strategies::StrategyRegistry;

pub async fn run() -> Result<()> {
    let registry = StrategyRegistry::new();

    println!("Available Strategies");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for info in registry.list() {
        println!("  {} ({})", info.name, info.key);
        println!("  ───────────────────────────────────────────────────────");
        println!("  {}", info.description);
        if let Some(params) = info.default_config.as_object() {
            for (name, value) in params {
                println!("    {:<22} {}", name, value);
            }
        }
        println!();
    }

    println!("Enable or tune strategies under [strategies] in the config file.");

    Ok(())
}
