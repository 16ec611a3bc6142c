//! Fades exhausted moves into rolling support/resistance.
//!
//! Levels are the rolling high and low at two scales (`lookback` and half of
//! it), including the current bar. Resistance is checked first, long scale
//! before short: a close within `proximity_pct` of a level with RSI confirming
//! exhaustion triggers a trade away from the level, stopped 1.5 ATR beyond it.

use fxsignal_core::error::StrategyError;
use fxsignal_core::traits::StrategyConfig;
use fxsignal_core::types::{Direction, PriceField, Signal, SignalKind};
use fxsignal_indicators::{IndicatorSet, LineExt};
use serde::{Deserialize, Serialize};

use crate::traits::{last_bar, Strategy};

const NAME: &str = "Enhanced Support/Resistance";

/// Configuration for the support/resistance strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportResistanceConfig {
    /// Long-scale level window; the short scale is half of it
    pub lookback: usize,
    /// Maximum relative distance from a level
    pub proximity_pct: f64,
    /// RSI period
    pub rsi_period: usize,
    /// ATR period for the stop
    pub atr_period: usize,
    /// Reward:risk ratio for the take-profit
    pub rr_ratio: f64,
}

impl Default for SupportResistanceConfig {
    fn default() -> Self {
        Self {
            lookback: 50,
            proximity_pct: 0.008,
            rsi_period: 14,
            atr_period: 14,
            rr_ratio: 2.0,
        }
    }
}

impl StrategyConfig for SupportResistanceConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.lookback < 2 {
            return Err(StrategyError::InvalidConfig(
                "lookback must be at least 2".into(),
            ));
        }
        if !(self.proximity_pct > 0.0) {
            return Err(StrategyError::InvalidConfig(
                "proximity_pct must be positive".into(),
            ));
        }
        Self::check_period("rsi_period", self.rsi_period)?;
        Self::check_period("atr_period", self.atr_period)?;
        Self::check_rr_ratio(self.rr_ratio)
    }
}

/// Support/resistance strategy.
#[derive(Debug, Clone)]
pub struct SupportResistanceStrategy {
    config: SupportResistanceConfig,
}

impl SupportResistanceStrategy {
    pub fn new(config: SupportResistanceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SupportResistanceConfig {
        &self.config
    }

    fn scales(&self) -> [usize; 2] {
        [self.config.lookback, self.config.lookback / 2]
    }
}

impl Default for SupportResistanceStrategy {
    fn default() -> Self {
        Self::new(SupportResistanceConfig::default())
    }
}

impl Strategy for SupportResistanceStrategy {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> SignalKind {
        SignalKind::Sr
    }

    fn description(&self) -> &str {
        "Close tests a rolling high/low at two scales with RSI showing exhaustion"
    }

    fn warmup_period(&self) -> usize {
        self.config
            .lookback
            .max(self.config.rsi_period + 1)
            .max(self.config.atr_period + 1)
    }

    fn evaluate(&self, indicators: &IndicatorSet<'_>) -> Result<Option<Signal>, StrategyError> {
        let Some((idx, timestamp)) = last_bar(indicators, self.warmup_period()) else {
            return Ok(None);
        };
        let cfg = &self.config;
        let (Some(rsi), Some(atr)) = (
            indicators.rsi(cfg.rsi_period)?.at(idx),
            indicators.atr(cfg.atr_period)?.at(idx),
        ) else {
            return Ok(None);
        };
        let price = indicators.field(PriceField::Close)[idx];
        let proximity = |level: f64| (price - level).abs() / level;

        let mut resistances = Vec::with_capacity(2);
        let mut supports = Vec::with_capacity(2);
        for window in self.scales() {
            resistances.push(indicators.rolling_max(PriceField::High, window)?.at(idx));
            supports.push(indicators.rolling_min(PriceField::Low, window)?.at(idx));
        }

        let triggered = resistances
            .into_iter()
            .flatten()
            .find(|&r| proximity(r) <= cfg.proximity_pct && price >= r * 0.998 && rsi > 60.0)
            .map(|r| {
                let score = (1.0 - proximity(r)) * 50.0 + (rsi - 60.0).min(40.0);
                (Direction::Sell, r, r + atr * 1.5, score)
            })
            .or_else(|| {
                supports
                    .into_iter()
                    .flatten()
                    .find(|&s| {
                        proximity(s) <= cfg.proximity_pct && price <= s * 1.002 && rsi < 40.0
                    })
                    .map(|s| {
                        let score = (1.0 - proximity(s)) * 50.0 + (40.0 - rsi).min(40.0);
                        (Direction::Buy, s, s - atr * 1.5, score)
                    })
            });

        let Some((direction, level, stop, confidence)) = triggered else {
            return Ok(None);
        };
        Ok(
            Signal::from_levels(NAME, SignalKind::Sr, direction, price, stop, cfg.rr_ratio).map(
                |signal| {
                    signal
                        .at_bar(idx, timestamp)
                        .with_confidence(confidence)
                        .with_metric("level", level)
                        .with_metric("rsi", rsi)
                        .with_metric("atr", atr)
                },
            ),
        )
    }
}
