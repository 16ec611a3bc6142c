//! Strategy registry for building detectors by key.

use fxsignal_core::error::StrategyError;
use fxsignal_core::traits::StrategyConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{
    BreakoutConfig, BreakoutStrategy, FibonacciConfig, FibonacciStrategy, MACrossoverConfig,
    MACrossoverStrategy, RsiReversalConfig, RsiReversalStrategy, Strategy,
    SupportResistanceConfig, SupportResistanceStrategy, TrendAtrConfig, TrendAtrStrategy,
};

/// Information about a registered strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Registry key ("breakout", "ma_crossover", ...)
    pub key: String,
    /// Strategy name
    pub name: String,
    /// Strategy description
    pub description: String,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

impl StrategyInfo {
    fn of(key: &str, strategy: &dyn Strategy, default_config: serde_json::Value) -> Self {
        Self {
            key: key.to_string(),
            name: strategy.name().to_string(),
            description: strategy.description().to_string(),
            default_config,
        }
    }
}

/// Registry of the built-in strategies, in aggregation order.
pub struct StrategyRegistry {
    strategies: Vec<StrategyInfo>,
}

fn to_json<T: Serialize>(config: &T) -> serde_json::Value {
    serde_json::to_value(config).unwrap_or(serde_json::Value::Null)
}

fn parse<C>(config: serde_json::Value) -> Result<C, StrategyError>
where
    C: StrategyConfig + DeserializeOwned,
{
    let config: C =
        serde_json::from_value(config).map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

impl StrategyRegistry {
    /// Create a registry with all built-in strategies.
    pub fn new() -> Self {
        let strategies = vec![
            StrategyInfo::of(
                "ma_crossover",
                &MACrossoverStrategy::default(),
                to_json(&MACrossoverConfig::default()),
            ),
            StrategyInfo::of(
                "rsi_reversal",
                &RsiReversalStrategy::default(),
                to_json(&RsiReversalConfig::default()),
            ),
            StrategyInfo::of(
                "breakout",
                &BreakoutStrategy::default(),
                to_json(&BreakoutConfig::default()),
            ),
            StrategyInfo::of(
                "trend_atr",
                &TrendAtrStrategy::default(),
                to_json(&TrendAtrConfig::default()),
            ),
            StrategyInfo::of(
                "support_resistance",
                &SupportResistanceStrategy::default(),
                to_json(&SupportResistanceConfig::default()),
            ),
            StrategyInfo::of(
                "fibonacci",
                &FibonacciStrategy::default(),
                to_json(&FibonacciConfig::default()),
            ),
        ];
        Self { strategies }
    }

    /// List all available strategies.
    pub fn list(&self) -> &[StrategyInfo] {
        &self.strategies
    }

    /// Get strategy info by key.
    pub fn get(&self, key: &str) -> Option<&StrategyInfo> {
        self.strategies.iter().find(|info| info.key == key)
    }

    /// Check if a strategy exists.
    pub fn exists(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Get all strategy keys.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|info| info.key.as_str()).collect()
    }

    /// Create a strategy instance from configuration.
    ///
    /// Missing fields fall back to their defaults; the merged configuration
    /// is validated before the strategy is built.
    pub fn create(
        &self,
        key: &str,
        config: serde_json::Value,
    ) -> Result<Box<dyn Strategy>, StrategyError> {
        match key {
            "ma_crossover" => Ok(Box::new(MACrossoverStrategy::new(parse(config)?))),
            "rsi_reversal" => Ok(Box::new(RsiReversalStrategy::new(parse(config)?))),
            "breakout" => Ok(Box::new(BreakoutStrategy::new(parse(config)?))),
            "trend_atr" => Ok(Box::new(TrendAtrStrategy::new(parse(config)?))),
            "support_resistance" => Ok(Box::new(SupportResistanceStrategy::new(parse(config)?))),
            "fibonacci" => Ok(Box::new(FibonacciStrategy::new(parse(config)?))),
            _ => Err(StrategyError::NotFound(key.to_string())),
        }
    }

    /// Create a strategy with default configuration.
    pub fn create_default(&self, key: &str) -> Result<Box<dyn Strategy>, StrategyError> {
        let info = self
            .get(key)
            .ok_or_else(|| StrategyError::NotFound(key.to_string()))?;
        self.create(key, info.default_config.clone())
    }

    /// Every built-in strategy with default configuration, in aggregation order.
    pub fn create_all(&self) -> Result<Vec<Box<dyn Strategy>>, StrategyError> {
        self.strategies
            .iter()
            .map(|info| self.create(&info.key, info.default_config.clone()))
            .collect()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
