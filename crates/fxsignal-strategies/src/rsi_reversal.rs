//! RSI reversal with a long-term trend filter.
//!
//! Buys when RSI climbs back out of deep oversold territory while price holds
//! above its long SMA and is not in free fall; sells on the mirror rejection
//! from overbought below the SMA. Stops use the recent swing extreme or a 3%
//! buffer around the SMA, whichever is further away.

use fxsignal_core::error::StrategyError;
use fxsignal_core::traits::StrategyConfig;
use fxsignal_core::types::{Direction, PriceField, Signal, SignalKind};
use fxsignal_indicators::{IndicatorSet, LineExt};
use serde::{Deserialize, Serialize};

use crate::traits::{last_bar, Strategy};

const NAME: &str = "Enhanced RSI Reversal";

/// Bars scanned for the swing extreme behind the stop.
const SWING_BARS: usize = 10;
/// Bars used for the free-fall / blow-off filter.
const CHANGE_BARS: usize = 5;

/// Configuration for the RSI reversal strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiReversalConfig {
    /// RSI period
    pub rsi_period: usize,
    /// Trend filter SMA period
    pub sma_period: usize,
    /// RSI level the previous bar must be at or below for a buy
    pub oversold: f64,
    /// RSI level the previous bar must be at or above for a sell
    pub overbought: f64,
    /// Largest adverse percent move over five bars still tradable
    pub max_change_pct: f64,
    /// Reward:risk ratio for the take-profit
    pub rr_ratio: f64,
}

impl Default for RsiReversalConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            sma_period: 200,
            oversold: 25.0,
            overbought: 75.0,
            max_change_pct: 2.0,
            rr_ratio: 2.5,
        }
    }
}

impl StrategyConfig for RsiReversalConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        Self::check_period("rsi_period", self.rsi_period)?;
        Self::check_period("sma_period", self.sma_period)?;
        if !(0.0..=100.0).contains(&self.oversold)
            || !(0.0..=100.0).contains(&self.overbought)
            || self.oversold >= self.overbought
        {
            return Err(StrategyError::InvalidConfig(
                "RSI thresholds must satisfy 0 <= oversold < overbought <= 100".into(),
            ));
        }
        Self::check_rr_ratio(self.rr_ratio)
    }
}

/// RSI reversal strategy.
#[derive(Debug, Clone)]
pub struct RsiReversalStrategy {
    config: RsiReversalConfig,
}

impl RsiReversalStrategy {
    pub fn new(config: RsiReversalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RsiReversalConfig {
        &self.config
    }
}

impl Default for RsiReversalStrategy {
    fn default() -> Self {
        Self::new(RsiReversalConfig::default())
    }
}

impl Strategy for RsiReversalStrategy {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> SignalKind {
        SignalKind::Rsi
    }

    fn description(&self) -> &str {
        "RSI exits oversold/overbought in the direction of the long SMA trend"
    }

    fn warmup_period(&self) -> usize {
        self.config
            .sma_period
            .max(self.config.rsi_period + 2)
            .max(SWING_BARS + 1)
    }

    fn evaluate(&self, indicators: &IndicatorSet<'_>) -> Result<Option<Signal>, StrategyError> {
        let Some((idx, timestamp)) = last_bar(indicators, self.warmup_period()) else {
            return Ok(None);
        };
        let cfg = &self.config;
        let rsi = indicators.rsi(cfg.rsi_period)?;
        let sma = indicators.sma(PriceField::Close, cfg.sma_period)?;
        let change = indicators.pct_change(CHANGE_BARS)?;

        let (Some(rsi_now), Some(rsi_prev), Some(sma), Some(change)) =
            (rsi.at(idx), rsi.at(idx - 1), sma.at(idx), change.at(idx))
        else {
            return Ok(None);
        };
        let price = indicators.field(PriceField::Close)[idx];
        let swing = idx.saturating_sub(SWING_BARS)..idx;

        let (direction, stop, confidence) = if rsi_prev <= cfg.oversold
            && rsi_now > cfg.oversold
            && price > sma
            && change > -cfg.max_change_pct
        {
            let swing_low = indicators.field(PriceField::Low)[swing]
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min);
            (
                Direction::Buy,
                swing_low.min(sma * 0.97),
                (30.0 - rsi_prev) * 2.0 + (price - sma) / sma * 100.0,
            )
        } else if rsi_prev >= cfg.overbought
            && rsi_now < cfg.overbought
            && price < sma
            && change < cfg.max_change_pct
        {
            let swing_high = indicators.field(PriceField::High)[swing]
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            (
                Direction::Sell,
                swing_high.max(sma * 1.03),
                (rsi_prev - 70.0) * 2.0 + (sma - price) / sma * 100.0,
            )
        } else {
            return Ok(None);
        };

        Ok(
            Signal::from_levels(NAME, SignalKind::Rsi, direction, price, stop, cfg.rr_ratio).map(
                |signal| {
                    signal
                        .at_bar(idx, timestamp)
                        .with_confidence(confidence)
                        .with_metric("rsi", rsi_now)
                        .with_metric("sma", sma)
                },
            ),
        )
    }
}
