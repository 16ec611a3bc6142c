//! Scanner settings.

use fxsignal_core::types::Timeframe;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What to scan and how fast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Symbols to scan, in order
    pub symbols: Vec<String>,
    /// Timeframes scanned for every symbol, in order
    pub timeframes: Vec<Timeframe>,
    /// Bars requested per pair
    pub candles: usize,
    /// Pairs with fewer bars are skipped
    pub min_bars: usize,
    /// Pause between consecutive pairs
    pub request_delay_ms: u64,
    /// Period of the in-process driver
    pub interval_secs: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            symbols: [
                "EURUSD", "GBPUSD", "USDJPY", "AUDUSD", "USDCAD", "USDCHF", "NZDUSD", "EURJPY",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            timeframes: vec![Timeframe::Hour4, Timeframe::Hour1, Timeframe::Minute15],
            candles: 300,
            min_bars: 50,
            request_delay_ms: 1000,
            interval_secs: 3600,
        }
    }
}

impl ScannerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Every symbol × timeframe pair in scan order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, Timeframe)> + '_ {
        self.symbols
            .iter()
            .flat_map(move |s| self.timeframes.iter().map(move |&tf| (s.as_str(), tf)))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.symbols.is_empty() {
            return Err("at least one symbol is required".into());
        }
        if self.timeframes.is_empty() {
            return Err("at least one timeframe is required".into());
        }
        if self.candles < self.min_bars {
            return Err(format!(
                "candles ({}) must be at least min_bars ({})",
                self.candles, self.min_bars
            ));
        }
        if self.interval_secs == 0 {
            return Err("interval_secs must be greater than 0".into());
        }
        Ok(())
    }
}
