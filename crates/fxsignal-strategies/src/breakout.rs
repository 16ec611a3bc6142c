//! Range breakout with ATR buffer and volume confirmation.
//!
//! Buys when the close clears the prior rolling high by more than half an
//! ATR on above-average volume; sells on the mirror break of the rolling low.
//! The stop sits half an ATR back inside the broken level.

use fxsignal_core::error::StrategyError;
use fxsignal_core::traits::StrategyConfig;
use fxsignal_core::types::{Direction, PriceField, Signal, SignalKind};
use fxsignal_indicators::{IndicatorSet, LineExt};
use serde::{Deserialize, Serialize};

use crate::traits::{last_bar, Strategy};

const NAME: &str = "Enhanced Breakout+ATR";

/// Configuration for the breakout strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutConfig {
    /// Bars in the rolling high/low range
    pub lookback: usize,
    /// ATR period
    pub atr_period: usize,
    /// Minimum volume over its rolling average
    pub min_volume_ratio: f64,
    /// Bars in the volume average
    pub volume_period: usize,
    /// Reward:risk ratio for the take-profit
    pub rr_ratio: f64,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            lookback: 20,
            atr_period: 14,
            min_volume_ratio: 1.2,
            volume_period: 20,
            rr_ratio: 2.0,
        }
    }
}

impl StrategyConfig for BreakoutConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        Self::check_period("lookback", self.lookback)?;
        Self::check_period("atr_period", self.atr_period)?;
        Self::check_period("volume_period", self.volume_period)?;
        if !(self.min_volume_ratio >= 0.0) {
            return Err(StrategyError::InvalidConfig(
                "min_volume_ratio must be non-negative".into(),
            ));
        }
        Self::check_rr_ratio(self.rr_ratio)
    }
}

/// Breakout strategy.
#[derive(Debug, Clone)]
pub struct BreakoutStrategy {
    config: BreakoutConfig,
}

impl BreakoutStrategy {
    pub fn new(config: BreakoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BreakoutConfig {
        &self.config
    }
}

impl Default for BreakoutStrategy {
    fn default() -> Self {
        Self::new(BreakoutConfig::default())
    }
}

impl Strategy for BreakoutStrategy {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> SignalKind {
        SignalKind::Breakout
    }

    fn description(&self) -> &str {
        "Close breaks the prior rolling high/low by more than half an ATR on rising volume"
    }

    fn warmup_period(&self) -> usize {
        (self.config.lookback + 1)
            .max(self.config.atr_period + 1)
            .max(self.config.volume_period)
    }

    fn evaluate(&self, indicators: &IndicatorSet<'_>) -> Result<Option<Signal>, StrategyError> {
        let Some((idx, timestamp)) = last_bar(indicators, self.warmup_period()) else {
            return Ok(None);
        };
        let cfg = &self.config;
        let highs = indicators.rolling_max(PriceField::High, cfg.lookback)?;
        let lows = indicators.rolling_min(PriceField::Low, cfg.lookback)?;
        let atr = indicators.atr(cfg.atr_period)?;
        let volume_ratio = indicators.volume_ratio(cfg.volume_period)?;

        let prev = idx - 1;
        let (Some(level_up), Some(level_dn), Some(atr), Some(ratio)) = (
            highs.at(prev),
            lows.at(prev),
            atr.at(idx),
            volume_ratio.at(idx),
        ) else {
            return Ok(None);
        };
        let close = indicators.field(PriceField::Close);
        let (entry, prev_close) = (close[idx], close[prev]);
        let volume_ok = ratio >= cfg.min_volume_ratio;

        let (direction, level, stop, distance) = if prev_close <= level_up
            && entry > level_up
            && entry - level_up > atr * 0.5
            && volume_ok
        {
            (Direction::Buy, level_up, level_up - atr * 0.5, entry - level_up)
        } else if prev_close >= level_dn
            && entry < level_dn
            && level_dn - entry > atr * 0.5
            && volume_ok
        {
            (Direction::Sell, level_dn, level_dn + atr * 0.5, level_dn - entry)
        } else {
            return Ok(None);
        };

        let confidence = distance / atr * 20.0 + ratio * 10.0;
        Ok(
            Signal::from_levels(NAME, SignalKind::Breakout, direction, entry, stop, cfg.rr_ratio)
                .map(|signal| {
                    signal
                        .at_bar(idx, timestamp)
                        .with_confidence(confidence)
                        .with_metric("atr", atr)
                        .with_metric("volume_ratio", ratio)
                        .with_metric("level", level)
                }),
        )
    }
}
