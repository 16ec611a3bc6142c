//! Moving Average Crossover Strategy.
//!
//! Buys when the fast EMA crosses above the slow EMA with RSI in a healthy
//! band, rising volume and positive five-bar momentum; sells on the mirror
//! cross. Stops are two ATRs from entry.

use fxsignal_core::error::StrategyError;
use fxsignal_core::traits::StrategyConfig;
use fxsignal_core::types::{Direction, PriceField, Signal, SignalKind};
use fxsignal_indicators::{IndicatorSet, LineExt};
use serde::{Deserialize, Serialize};

use crate::traits::{last_bar, Strategy};

const NAME: &str = "Enhanced MA+RSI Crossover";

/// Bars back used for the momentum confirmation.
const MOMENTUM_BARS: usize = 5;

/// Configuration for the MA Crossover strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MACrossoverConfig {
    /// Fast EMA span
    pub fast_period: usize,
    /// Slow EMA span
    pub slow_period: usize,
    /// RSI period
    pub rsi_period: usize,
    /// ATR period for the stop
    pub atr_period: usize,
    /// Bars in the volume average
    pub volume_period: usize,
    /// Volume ratio that must be exceeded
    pub min_volume_ratio: f64,
    /// Reward:risk ratio for the take-profit
    pub rr_ratio: f64,
}

impl Default for MACrossoverConfig {
    fn default() -> Self {
        Self {
            fast_period: 10,
            slow_period: 50,
            rsi_period: 14,
            atr_period: 14,
            volume_period: 20,
            min_volume_ratio: 1.1,
            rr_ratio: 2.0,
        }
    }
}

impl StrategyConfig for MACrossoverConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.fast_period >= self.slow_period {
            return Err(StrategyError::InvalidConfig(
                "Fast period must be less than slow period".into(),
            ));
        }
        Self::check_period("fast_period", self.fast_period)?;
        Self::check_period("rsi_period", self.rsi_period)?;
        Self::check_period("atr_period", self.atr_period)?;
        Self::check_period("volume_period", self.volume_period)?;
        Self::check_rr_ratio(self.rr_ratio)
    }
}

/// Moving Average Crossover Strategy.
#[derive(Debug, Clone)]
pub struct MACrossoverStrategy {
    config: MACrossoverConfig,
}

impl MACrossoverStrategy {
    /// Create a new MA Crossover strategy.
    pub fn new(config: MACrossoverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MACrossoverConfig {
        &self.config
    }
}

impl Default for MACrossoverStrategy {
    fn default() -> Self {
        Self::new(MACrossoverConfig::default())
    }
}

impl Strategy for MACrossoverStrategy {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> SignalKind {
        SignalKind::Ma
    }

    fn description(&self) -> &str {
        "Fast/slow EMA crossover confirmed by RSI, volume and five-bar momentum"
    }

    fn warmup_period(&self) -> usize {
        let cfg = &self.config;
        (cfg.slow_period + 1)
            .max(cfg.rsi_period + 1)
            .max(cfg.atr_period + 1)
            .max(cfg.volume_period)
            .max(MOMENTUM_BARS + 1)
    }

    fn evaluate(&self, indicators: &IndicatorSet<'_>) -> Result<Option<Signal>, StrategyError> {
        let Some((idx, timestamp)) = last_bar(indicators, self.warmup_period()) else {
            return Ok(None);
        };
        let cfg = &self.config;
        let fast = indicators.ema(PriceField::Close, cfg.fast_period)?;
        let slow = indicators.ema(PriceField::Close, cfg.slow_period)?;
        let rsi = indicators.rsi(cfg.rsi_period)?;
        let atr = indicators.atr(cfg.atr_period)?;
        let volume_ratio = indicators.volume_ratio(cfg.volume_period)?;

        let prev = idx - 1;
        let (Some(fast_prev), Some(slow_prev), Some(fast_now), Some(slow_now)) =
            (fast.at(prev), slow.at(prev), fast.at(idx), slow.at(idx))
        else {
            return Ok(None);
        };
        let (Some(rsi), Some(atr), Some(ratio)) = (rsi.at(idx), atr.at(idx), volume_ratio.at(idx))
        else {
            return Ok(None);
        };

        let close = indicators.field(PriceField::Close);
        let entry = close[idx];
        let momentum_base = close[idx - MOMENTUM_BARS];
        let volume_ok = ratio > cfg.min_volume_ratio;

        let cross_up = fast_prev <= slow_prev && fast_now > slow_now;
        let cross_dn = fast_prev >= slow_prev && fast_now < slow_now;

        let (direction, confidence) =
            if cross_up && rsi > 45.0 && rsi < 75.0 && volume_ok && entry > momentum_base {
                (Direction::Buy, rsi - 45.0 + ratio * 10.0)
            } else if cross_dn && rsi < 55.0 && rsi > 25.0 && volume_ok && entry < momentum_base {
                (Direction::Sell, 55.0 - rsi + ratio * 10.0)
            } else {
                return Ok(None);
            };

        let stop = entry - direction.sign() * atr * 2.0;
        Ok(
            Signal::from_levels(NAME, SignalKind::Ma, direction, entry, stop, cfg.rr_ratio).map(
                |signal| {
                    signal
                        .at_bar(idx, timestamp)
                        .with_confidence(confidence)
                        .with_metric("rsi", rsi)
                        .with_metric("volume_ratio", ratio)
                        .with_metric("atr", atr)
                },
            ),
        )
    }
}
