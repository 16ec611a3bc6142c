//! One-shot scan command, meant to be triggered by cron.

use anyhow::Result;
use fxsignal_config::AppConfig;
use tracing::info;

use super::build_scanner;
use crate::cli::{OutputFormat, ScanArgs};

pub async fn run(args: ScanArgs, config: &AppConfig) -> Result<()> {
    let scanner = build_scanner(config, args.dry_run)?;
    let report = scanner.scan_once().await;

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary_text()),
    }

    if let Some(save_path) = &args.save {
        std::fs::write(save_path, report.to_json()?)?;
        info!("Report saved to {:?}", save_path);
    }

    Ok(())
}
