//! Analyze one series without sending anything.

use anyhow::{Context, Result};
use fxsignal_config::AppConfig;
use fxsignal_core::traits::MarketDataProvider;
use fxsignal_core::types::Alert;
use fxsignal_data::{load_csv, CsvDirectoryProvider};
use fxsignal_notify::{render_chart, MessageFormat};
use tracing::info;

use super::build_aggregator;
use crate::cli::{AnalyzeArgs, OutputFormat};

pub async fn run(args: AnalyzeArgs, config: &AppConfig) -> Result<()> {
    let series = match &args.data {
        Some(path) => load_csv(path, &args.symbol, args.timeframe)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => CsvDirectoryProvider::new(&config.data.dir)
            .fetch_recent(&args.symbol, args.timeframe, config.scanner.candles)
            .await
            .with_context(|| format!("Failed to load {} {}", args.symbol, args.timeframe))?,
    };
    info!(symbol = %args.symbol, timeframe = %args.timeframe, bars = series.len(), "Loaded series");

    let aggregate = build_aggregator(config)?.evaluate(&series);

    if let OutputFormat::Json = args.output {
        println!("{}", serde_json::to_string_pretty(&aggregate.signals)?);
        return Ok(());
    }

    println!(
        "{} {}: {} bars",
        args.symbol,
        args.timeframe.label(),
        series.len()
    );
    for failure in &aggregate.failures {
        println!("  ! {} failed: {}", failure.strategy, failure.error);
    }

    if aggregate.signals.is_empty() {
        println!("No signals found");
        return Ok(());
    }

    println!("\nFound {} signal(s):", aggregate.signals.len());
    for (i, signal) in aggregate.signals.iter().enumerate() {
        println!("\n{}. {}", i + 1, signal.strategy);
        println!("   Signal: {}", signal.direction);
        println!("   Entry: {:.5}", signal.entry);
        println!("   Stop Loss: {:.5}", signal.stop_loss);
        println!("   Take Profit: {:.5}", signal.take_profit);
        if let Some(confidence) = signal.confidence {
            println!("   Confidence: {:.1}%", confidence);
        }
    }

    if let Some(best) = aggregate.best() {
        let alert = Alert::new(
            args.symbol.as_str(),
            args.timeframe,
            config.app.bot_name.as_str(),
            best.clone(),
        );
        println!("\nFormatted message:\n{}", MessageFormat::Markdown.render(&alert));

        if let Some(path) = &args.chart {
            let png = render_chart(&alert, &series, &config.telegram.chart)
                .context("Failed to render chart")?;
            std::fs::write(path, png)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Chart saved to {:?}", path);
        }
    }

    Ok(())
}
