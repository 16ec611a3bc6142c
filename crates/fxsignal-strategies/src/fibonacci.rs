//! Fibonacci retracement with RSI and MACD momentum confirmation.
//!
//! Retracement levels are measured down from the rolling swing high over
//! `lookback` bars. Only the level nearest the close is considered, and only
//! when it lies within `proximity_threshold`. Shallow levels (up to 0.618)
//! are bought on a rising MACD histogram; deep ones (from 0.382) are sold on
//! a falling one.

use fxsignal_core::error::StrategyError;
use fxsignal_core::traits::StrategyConfig;
use fxsignal_core::types::{Direction, PriceField, Signal, SignalKind};
use fxsignal_indicators::{IndicatorSet, LineExt};
use serde::{Deserialize, Serialize};

use crate::traits::{last_bar, Strategy};

const NAME: &str = "Enhanced Fibonacci";

/// Retracement ratios, shallow to deep.
pub const FIB_LEVELS: [f64; 5] = [0.236, 0.382, 0.5, 0.618, 0.786];

/// Configuration for the Fibonacci strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FibonacciConfig {
    /// Bars in the swing high/low window
    pub lookback: usize,
    /// Maximum relative distance to the nearest level
    pub proximity_threshold: f64,
    /// RSI period
    pub rsi_period: usize,
    /// MACD fast EMA span
    pub macd_fast: usize,
    /// MACD slow EMA span
    pub macd_slow: usize,
    /// MACD signal EMA span
    pub macd_signal: usize,
    /// Reward:risk ratio for the take-profit
    pub rr_ratio: f64,
}

impl Default for FibonacciConfig {
    fn default() -> Self {
        Self {
            lookback: 100,
            proximity_threshold: 0.01,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            rr_ratio: 2.0,
        }
    }
}

impl StrategyConfig for FibonacciConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        Self::check_period("lookback", self.lookback)?;
        Self::check_period("rsi_period", self.rsi_period)?;
        Self::check_period("macd_fast", self.macd_fast)?;
        Self::check_period("macd_signal", self.macd_signal)?;
        if self.macd_fast >= self.macd_slow {
            return Err(StrategyError::InvalidConfig(
                "macd_fast must be less than macd_slow".into(),
            ));
        }
        if !(self.proximity_threshold > 0.0) {
            return Err(StrategyError::InvalidConfig(
                "proximity_threshold must be positive".into(),
            ));
        }
        Self::check_rr_ratio(self.rr_ratio)
    }
}

/// Fibonacci retracement strategy.
#[derive(Debug, Clone)]
pub struct FibonacciStrategy {
    config: FibonacciConfig,
}

impl FibonacciStrategy {
    pub fn new(config: FibonacciConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FibonacciConfig {
        &self.config
    }
}

impl Default for FibonacciStrategy {
    fn default() -> Self {
        Self::new(FibonacciConfig::default())
    }
}

/// Nearest retracement level to `price` as `(ratio, level price, relative distance)`.
///
/// `None` when the swing has no range.
pub fn nearest_level(high: f64, low: f64, price: f64) -> Option<(f64, f64, f64)> {
    let range = high - low;
    if !(range > 0.0) || price == 0.0 {
        return None;
    }
    FIB_LEVELS
        .iter()
        .map(|&ratio| {
            let level = high - range * ratio;
            (ratio, level, (price - level).abs() / price)
        })
        .min_by(|a, b| a.2.total_cmp(&b.2))
}

impl Strategy for FibonacciStrategy {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> SignalKind {
        SignalKind::Fib
    }

    fn description(&self) -> &str {
        "Close near a retracement of the recent swing with RSI and MACD histogram confirmation"
    }

    fn warmup_period(&self) -> usize {
        self.config.lookback.max(self.config.rsi_period + 1).max(2)
    }

    fn evaluate(&self, indicators: &IndicatorSet<'_>) -> Result<Option<Signal>, StrategyError> {
        let Some((idx, timestamp)) = last_bar(indicators, self.warmup_period()) else {
            return Ok(None);
        };
        let cfg = &self.config;
        let highs = indicators.rolling_max(PriceField::High, cfg.lookback)?;
        let lows = indicators.rolling_min(PriceField::Low, cfg.lookback)?;
        let rsi = indicators.rsi(cfg.rsi_period)?;
        let macd = indicators.macd(cfg.macd_fast, cfg.macd_slow, cfg.macd_signal)?;

        let (Some(high), Some(low), Some(rsi), Some(hist_now), Some(hist_prev)) = (
            highs.at(idx),
            lows.at(idx),
            rsi.at(idx),
            macd.histogram.at(idx),
            macd.histogram.at(idx - 1),
        ) else {
            return Ok(None);
        };
        let entry = indicators.field(PriceField::Close)[idx];

        let Some((ratio, level, distance)) = nearest_level(high, low, entry) else {
            return Ok(None);
        };
        if distance > cfg.proximity_threshold {
            return Ok(None);
        }

        let (direction, stop, confidence) = if entry <= level * 1.005
            && ratio <= 0.618
            && rsi < 70.0
            && hist_now > hist_prev
        {
            (Direction::Buy, low * 0.995, (70.0 - rsi) + (1.0 - ratio) * 50.0)
        } else if entry >= level * 0.995 && ratio >= 0.382 && rsi > 30.0 && hist_now < hist_prev {
            (Direction::Sell, high * 1.005, rsi - 30.0 + ratio * 50.0)
        } else {
            return Ok(None);
        };

        Ok(
            Signal::from_levels(NAME, SignalKind::Fib, direction, entry, stop, cfg.rr_ratio).map(
                |signal| {
                    signal
                        .at_bar(idx, timestamp)
                        .with_confidence(confidence)
                        .with_metric("fib_level", ratio)
                        .with_metric("rsi", rsi)
                        .with_metric("macd_histogram", hist_now)
                },
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{from_closes, series};

    // Two flat bars, a 48-bar leg of 0.2, a 49-bar retracement ending 0.001
    // beyond the 0.5 level, then one bar back onto it.
    fn swing_closes(bullish: bool) -> Vec<f64> {
        let (start, end) = if bullish { (1.0, 1.2) } else { (1.2, 1.0) };
        let step = (end - start) / 48.0;
        let mut closes = vec![start, start];
        closes.extend((1..=48).map(|k| start + step * k as f64));
        let target = 1.1 - (end - start).signum() * 0.001;
        let back = (target - end) / 49.0;
        closes.extend((1..=49).map(|k| end + back * k as f64));
        closes.push(1.1);
        closes
    }

    #[test]
    fn test_nearest_level() {
        let (ratio, level, distance) = nearest_level(2.0, 1.0, 1.5).unwrap();
        assert_eq!(ratio, 0.5);
        assert_eq!(level, 1.5);
        assert_eq!(distance, 0.0);

        let (ratio, _, _) = nearest_level(2.0, 1.0, 1.25).unwrap();
        assert_eq!(ratio, 0.786);

        assert!(nearest_level(1.0, 1.0, 1.0).is_none());
    }

    #[test]
    fn test_config_validation() {
        assert!(FibonacciConfig::default().validate().is_ok());

        let config = FibonacciConfig {
            macd_fast: 26,
            macd_slow: 12,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_buy_at_half_retracement() {
        let closes = swing_closes(true);
        assert_eq!(closes.len(), 100);
        let series = series(from_closes(&closes, 0.001));

        let signal = FibonacciStrategy::default()
            .evaluate_series(&series)
            .unwrap()
            .expect("retracement bounce should trigger");

        assert_eq!(signal.direction, Direction::Buy);
        assert_eq!(signal.metric("fib_level"), Some(0.5));
        // Swing low 0.999 less half a percent
        assert!((signal.stop_loss - 0.999 * 0.995).abs() < 1e-9);
        assert!(signal.metric("rsi").unwrap() < 70.0);
        assert!(signal.levels_consistent());
    }

    #[test]
    fn test_sell_at_half_retracement() {
        let series = series(from_closes(&swing_closes(false), 0.001));

        let signal = FibonacciStrategy::default()
            .evaluate_series(&series)
            .unwrap()
            .expect("retracement rejection should trigger");

        assert_eq!(signal.direction, Direction::Sell);
        assert!((signal.stop_loss - 1.201 * 1.005).abs() < 1e-9);
        assert!(signal.levels_consistent());
    }

    #[test]
    fn test_flat_swing_is_silent() {
        let series = series(from_closes(&[1.1; 120], 0.0));
        assert!(FibonacciStrategy::default()
            .evaluate_series(&series)
            .unwrap()
            .is_none());
    }
}
