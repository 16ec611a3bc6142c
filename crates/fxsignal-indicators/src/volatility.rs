//! Volatility indicators.

use fxsignal_core::error::IndicatorError;
use fxsignal_core::traits::Indicator;
use statrs::statistics::Statistics;

use crate::moving_average::rolling_mean;
use crate::require_period;

/// True Range for each bar.
///
/// `max(high - low, |high - prev_close|, |low - prev_close|)`; undefined at the
/// first bar since there is no previous close.
pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<Option<f64>> {
    let len = high.len().min(low.len()).min(close.len());
    let mut tr = Vec::with_capacity(len);

    for i in 0..len {
        if i == 0 {
            tr.push(None);
            continue;
        }
        let high_low = high[i] - low[i];
        let high_close = (high[i] - close[i - 1]).abs();
        let low_close = (low[i] - close[i - 1]).abs();
        tr.push(Some(high_low.max(high_close).max(low_close)));
    }

    tr
}

/// Standard Deviation (sample, n - 1).
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
}

impl StdDev {
    /// Create a new standard deviation indicator.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        require_period("StdDev", period, 2)?;
        Ok(Self { period })
    }
}

impl Indicator for StdDev {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len().min(self.period - 1)];
        result.extend(data.windows(self.period).map(|window| Some(window.std_dev())));
        result
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "StdDev"
    }
}

/// Average True Range (ATR).
///
/// Simple rolling mean of True Range, so the first value appears at
/// index `period`.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
}

impl Atr {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        require_period("ATR", period, 1)?;
        Ok(Self { period })
    }

    /// ATR from OHLC columns.
    pub fn calculate_ohlc(&self, high: &[f64], low: &[f64], close: &[f64]) -> Vec<Option<f64>> {
        self.from_true_range(&true_range(high, low, close))
    }

    /// ATR from an already computed True Range line.
    pub fn from_true_range(&self, tr: &[Option<f64>]) -> Vec<Option<f64>> {
        rolling_mean(tr, self.period)
    }
}
