//! Trend following on ATR band breaks, filtered by ADX.
//!
//! The band is the previous close plus or minus a multiple of the current ATR.
//! The multiple widens from 1.5 to 2.0 while ATR runs above its own 50-bar
//! average. A break needs ADX above the threshold, the matching directional
//! line on top, and price on the same side of the Bollinger middle.

use fxsignal_core::error::StrategyError;
use fxsignal_core::traits::StrategyConfig;
use fxsignal_core::types::{Direction, PriceField, Signal, SignalKind};
use fxsignal_indicators::{IndicatorSet, LineExt};
use serde::{Deserialize, Serialize};

use crate::traits::{last_bar, Strategy};

const NAME: &str = "Enhanced Trend+ATR";

const CALM_MULTIPLIER: f64 = 1.5;
const VOLATILE_MULTIPLIER: f64 = 2.0;

/// Configuration for the Trend+ATR strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendAtrConfig {
    /// ATR and directional movement period
    pub atr_period: usize,
    /// Bollinger period for the trend-side filter
    pub trend_period: usize,
    /// Bollinger width in standard deviations
    pub bollinger_k: f64,
    /// Widen the band while ATR is above its average
    pub volatility_filter: bool,
    /// Bars in the ATR average
    pub atr_average_period: usize,
    /// Minimum ADX
    pub adx_threshold: f64,
    /// Reward:risk ratio for the take-profit
    pub rr_ratio: f64,
}

impl Default for TrendAtrConfig {
    fn default() -> Self {
        Self {
            atr_period: 14,
            trend_period: 20,
            bollinger_k: 2.0,
            volatility_filter: true,
            atr_average_period: 50,
            adx_threshold: 25.0,
            rr_ratio: 2.0,
        }
    }
}

impl StrategyConfig for TrendAtrConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        Self::check_period("atr_period", self.atr_period)?;
        Self::check_period("atr_average_period", self.atr_average_period)?;
        if self.trend_period < 2 {
            return Err(StrategyError::InvalidConfig(
                "trend_period must be at least 2".into(),
            ));
        }
        if !(self.bollinger_k > 0.0) {
            return Err(StrategyError::InvalidConfig(
                "bollinger_k must be positive".into(),
            ));
        }
        Self::check_rr_ratio(self.rr_ratio)
    }
}

/// Trend+ATR strategy.
#[derive(Debug, Clone)]
pub struct TrendAtrStrategy {
    config: TrendAtrConfig,
}

impl TrendAtrStrategy {
    pub fn new(config: TrendAtrConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrendAtrConfig {
        &self.config
    }

    fn multiplier(
        &self,
        indicators: &IndicatorSet<'_>,
        idx: usize,
        atr: f64,
    ) -> Result<f64, StrategyError> {
        if !self.config.volatility_filter {
            return Ok(CALM_MULTIPLIER);
        }
        let average = indicators.atr_mean(self.config.atr_period, self.config.atr_average_period)?;
        Ok(match average.at(idx) {
            Some(average) if atr > average => VOLATILE_MULTIPLIER,
            _ => CALM_MULTIPLIER,
        })
    }
}

impl Default for TrendAtrStrategy {
    fn default() -> Self {
        Self::new(TrendAtrConfig::default())
    }
}

impl Strategy for TrendAtrStrategy {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> SignalKind {
        SignalKind::Atr
    }

    fn description(&self) -> &str {
        "Close breaks an ATR band around the previous close in a strong ADX trend"
    }

    fn warmup_period(&self) -> usize {
        (2 * self.config.atr_period).max(self.config.trend_period)
    }

    fn evaluate(&self, indicators: &IndicatorSet<'_>) -> Result<Option<Signal>, StrategyError> {
        let Some((idx, timestamp)) = last_bar(indicators, self.warmup_period()) else {
            return Ok(None);
        };
        let cfg = &self.config;
        let atr = indicators.atr(cfg.atr_period)?;
        let trend = indicators.directional(cfg.atr_period)?;
        let bands = indicators.bollinger(cfg.trend_period, cfg.bollinger_k)?;

        let (Some(atr), Some(adx), Some(plus_di), Some(minus_di), Some(middle)) = (
            atr.at(idx),
            trend.adx.at(idx),
            trend.plus_di.at(idx),
            trend.minus_di.at(idx),
            bands.middle.at(idx),
        ) else {
            return Ok(None);
        };

        let close = indicators.field(PriceField::Close);
        let (price, prev_price) = (close[idx], close[idx - 1]);
        let offset = atr * self.multiplier(indicators, idx, atr)?;
        let (upper, lower) = (prev_price + offset, prev_price - offset);
        let trending = adx > cfg.adx_threshold;

        let (direction, confidence) = if prev_price <= upper
            && price > upper
            && trending
            && plus_di > minus_di
            && price > middle
        {
            (Direction::Buy, adx + (price - middle) / middle * 100.0)
        } else if prev_price >= lower
            && price < lower
            && trending
            && minus_di > plus_di
            && price < middle
        {
            (Direction::Sell, adx + (middle - price) / middle * 100.0)
        } else {
            return Ok(None);
        };

        let stop = price - direction.sign() * atr * 2.0;
        Ok(
            Signal::from_levels(NAME, SignalKind::Atr, direction, price, stop, cfg.rr_ratio).map(
                |signal| {
                    signal
                        .at_bar(idx, timestamp)
                        .with_confidence(confidence)
                        .with_metric("adx", adx)
                        .with_metric("atr", atr)
                        .with_metric("plus_di", plus_di)
                        .with_metric("minus_di", minus_di)
                },
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bar, series};
    use fxsignal_core::types::Bar;

    // Steady 0.001 trend whose trailing bar edge alternates, so only the
    // leading side registers directional movement; the last bar then jumps.
    fn trend_bars(bullish: bool, jump: f64) -> Vec<Bar> {
        let sign = if bullish { 1.0 } else { -1.0 };
        let mut closes: Vec<f64> = (0..120).map(|i| 1.2 + sign * 0.001 * i as f64).collect();
        closes.push(closes[119] + sign * jump);

        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let wobble = 0.0004 * (i % 2) as f64;
                if bullish {
                    bar(i, c, c + 0.0005, c - 0.0005 - wobble, c)
                } else {
                    bar(i, c, c + 0.0005 + wobble, c - 0.0005, c)
                }
            })
            .collect()
    }

    #[test]
    fn test_config_validation() {
        assert!(TrendAtrConfig::default().validate().is_ok());

        let config = TrendAtrConfig {
            trend_period: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bullish_band_break() {
        let series = series(trend_bars(true, 0.006));
        let signal = TrendAtrStrategy::default()
            .evaluate_series(&series)
            .unwrap()
            .expect("band break should trigger");

        assert_eq!(signal.direction, Direction::Buy);
        assert!(signal.metric("adx").unwrap() > 25.0);
        assert!(signal.metric("plus_di").unwrap() > signal.metric("minus_di").unwrap());
        let atr = signal.metric("atr").unwrap();
        assert!((signal.entry - signal.stop_loss - 2.0 * atr).abs() < 1e-12);
        assert!(signal.confidence.unwrap() <= 100.0);
        assert!(signal.levels_consistent());
    }

    #[test]
    fn test_bearish_band_break() {
        let series = series(trend_bars(false, 0.006));
        let signal = TrendAtrStrategy::default()
            .evaluate_series(&series)
            .unwrap()
            .expect("band break should trigger");

        assert_eq!(signal.direction, Direction::Sell);
        assert!(signal.stop_loss > signal.entry);
        assert!(signal.levels_consistent());
    }

    #[test]
    fn test_ordinary_bar_stays_inside_band() {
        let series = series(trend_bars(true, 0.001));
        assert!(TrendAtrStrategy::default()
            .evaluate_series(&series)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_volatility_filter_widens_band() {
        // ATR ~0.00164 after the jump: a 1.5x band is cleared by 0.003, a 2.0x band is not.
        let bars = trend_bars(true, 0.003);
        let series = series(bars);

        let filtered = TrendAtrStrategy::default();
        assert!(filtered.evaluate_series(&series).unwrap().is_none());

        let unfiltered = TrendAtrStrategy::new(TrendAtrConfig {
            volatility_filter: false,
            ..Default::default()
        });
        assert!(unfiltered.evaluate_series(&series).unwrap().is_some());
    }
}
