//! Configuration structures.

use fxsignal_core::error::{FxSignalError, NotifyError, StrategyError};
use fxsignal_core::traits::StrategyConfig;
use fxsignal_notify::{ChartOptions, TelegramConfig};
use fxsignal_scanner::ScannerConfig;
use fxsignal_strategies::{
    BreakoutConfig, BreakoutStrategy, FibonacciConfig, FibonacciStrategy, MACrossoverConfig,
    MACrossoverStrategy, RsiReversalConfig, RsiReversalStrategy, Strategy, StrategyRegistry,
    SupportResistanceConfig, SupportResistanceStrategy, TrendAtrConfig, TrendAtrStrategy,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub telegram: TelegramSettings,
    #[serde(default)]
    pub strategies: StrategySettings,
}

impl AppConfig {
    /// Check cross-field constraints and every enabled strategy config.
    pub fn validate(&self) -> Result<(), FxSignalError> {
        self.scanner.validate().map_err(FxSignalError::Config)?;
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(FxSignalError::Config(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        if self.telegram.send_charts {
            self.telegram
                .chart
                .validate()
                .map_err(|e| FxSignalError::Config(e.to_string()))?;
        }
        self.strategies.build()?;
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    /// Signature at the bottom of every alert
    pub bot_name: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "fxsignal".to_string(),
            bot_name: "FX Signal Bot".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Where CSV bars are read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub dir: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
        }
    }
}

/// Telegram delivery. Credentials are only ever read from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramSettings {
    pub enabled: bool,
    pub token_env: String,
    pub chat_id_env: String,
    pub api_base_url: String,
    /// Follow each accepted alert with a chart photo
    pub send_charts: bool,
    pub chart: ChartOptions,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            token_env: "TELEGRAM_BOT_TOKEN".to_string(),
            chat_id_env: "TELEGRAM_CHAT_ID".to_string(),
            api_base_url: fxsignal_notify::DEFAULT_API_BASE.to_string(),
            send_charts: true,
            chart: ChartOptions::default(),
        }
    }
}

impl TelegramSettings {
    /// Read credentials from the configured environment variables.
    pub fn resolve(&self) -> Result<TelegramConfig, NotifyError> {
        Ok(TelegramConfig::from_env(&self.token_env, &self.chat_id_env)?
            .with_base_url(self.api_base_url.clone()))
    }

    /// Chart options when charts are switched on.
    pub fn chart_options(&self) -> Option<ChartOptions> {
        self.send_charts.then_some(self.chart)
    }
}

/// Per-strategy parameters and which strategies run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySettings {
    /// Registry keys of the strategies to run
    pub enabled: Vec<String>,
    pub ma_crossover: MACrossoverConfig,
    pub rsi_reversal: RsiReversalConfig,
    pub breakout: BreakoutConfig,
    pub trend_atr: TrendAtrConfig,
    pub support_resistance: SupportResistanceConfig,
    pub fibonacci: FibonacciConfig,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            enabled: StrategyRegistry::new()
                .names()
                .into_iter()
                .map(String::from)
                .collect(),
            ma_crossover: MACrossoverConfig::default(),
            rsi_reversal: RsiReversalConfig::default(),
            breakout: BreakoutConfig::default(),
            trend_atr: TrendAtrConfig::default(),
            support_resistance: SupportResistanceConfig::default(),
            fibonacci: FibonacciConfig::default(),
        }
    }
}

fn validated<C: StrategyConfig>(config: &C) -> Result<C, StrategyError> {
    config.validate()?;
    Ok(config.clone())
}

impl StrategySettings {
    /// Build the enabled strategies in aggregation order.
    pub fn build(&self) -> Result<Vec<Box<dyn Strategy>>, StrategyError> {
        let registry = StrategyRegistry::new();
        if let Some(unknown) = self.enabled.iter().find(|key| !registry.exists(key)) {
            return Err(StrategyError::NotFound(unknown.clone()));
        }

        let mut strategies: Vec<Box<dyn Strategy>> = Vec::new();
        for key in registry.names() {
            if !self.enabled.iter().any(|k| k == key) {
                continue;
            }
            strategies.push(match key {
                "ma_crossover" => Box::new(MACrossoverStrategy::new(validated(&self.ma_crossover)?)),
                "rsi_reversal" => Box::new(RsiReversalStrategy::new(validated(&self.rsi_reversal)?)),
                "breakout" => Box::new(BreakoutStrategy::new(validated(&self.breakout)?)),
                "trend_atr" => Box::new(TrendAtrStrategy::new(validated(&self.trend_atr)?)),
                "support_resistance" => Box::new(SupportResistanceStrategy::new(validated(
                    &self.support_resistance,
                )?)),
                "fibonacci" => Box::new(FibonacciStrategy::new(validated(&self.fibonacci)?)),
                other => return Err(StrategyError::NotFound(other.to_string())),
            });
        }
        Ok(strategies)
    }

    /// Effective parameters of every strategy as JSON, keyed by registry key.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_build_order() {
        let strategies = StrategySettings::default().build().unwrap();
        let names: Vec<&str> = strategies.iter().map(|s| s.name()).collect();
        assert_eq!(names.len(), 6);
        assert_eq!(names[0], "Enhanced MA+RSI Crossover");
        assert_eq!(names[5], "Enhanced Fibonacci");
    }

    #[test]
    fn test_enabled_subset_keeps_canonical_order() {
        let settings = StrategySettings {
            enabled: vec!["fibonacci".into(), "breakout".into()],
            ..Default::default()
        };
        let names: Vec<String> = settings
            .build()
            .unwrap()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["Enhanced Breakout+ATR", "Enhanced Fibonacci"]);
    }

    #[test]
    fn test_unknown_and_invalid_strategies() {
        let settings = StrategySettings {
            enabled: vec!["scalper".into()],
            ..Default::default()
        };
        assert!(matches!(settings.build(), Err(StrategyError::NotFound(_))));

        let mut settings = StrategySettings::default();
        settings.trend_atr.rr_ratio = 0.0;
        assert!(matches!(settings.build(), Err(StrategyError::InvalidConfig(_))));
    }

    #[test]
    fn test_app_validation() {
        assert!(AppConfig::default().validate().is_ok());

        let mut config = AppConfig::default();
        config.logging.format = "xml".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.scanner.symbols.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.telegram.chart.bars = 0;
        assert!(config.validate().is_err());
        config.telegram.send_charts = false;
        assert!(config.validate().is_ok());
        assert!(config.telegram.chart_options().is_none());
    }
}
