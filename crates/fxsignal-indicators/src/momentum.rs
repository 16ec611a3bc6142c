//! Momentum indicators.

use fxsignal_core::error::IndicatorError;
use fxsignal_core::traits::Indicator;
use serde::{Deserialize, Serialize};

use crate::moving_average::{rolling_mean, Ema};
use crate::require_period;

/// Relative Strength Index (RSI).
///
/// Uses simple rolling means of gains and losses (not Wilder smoothing).
/// Zero average loss yields 100 when there were gains and 50 when the
/// window was completely flat.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        require_period("RSI", period, 1)?;
        Ok(Self { period })
    }

    /// RSI from an average gain and average loss.
    pub fn from_averages(gain: f64, loss: f64) -> f64 {
        if loss == 0.0 {
            if gain == 0.0 {
                50.0
            } else {
                100.0
            }
        } else {
            100.0 - (100.0 / (1.0 + gain / loss))
        }
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut gains = Vec::with_capacity(data.len());
        let mut losses = Vec::with_capacity(data.len());

        for i in 0..data.len() {
            if i == 0 {
                gains.push(None);
                losses.push(None);
                continue;
            }
            let change = data[i] - data[i - 1];
            gains.push(Some(change.max(0.0)));
            losses.push(Some((-change).max(0.0)));
        }

        let avg_gains = rolling_mean(&gains, self.period);
        let avg_losses = rolling_mean(&losses, self.period);

        avg_gains
            .into_iter()
            .zip(avg_losses)
            .map(|(gain, loss)| Some(Self::from_averages(gain?, loss?)))
            .collect()
    }

    fn warmup(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub histogram: f64,
}

/// MACD indicator.
///
/// Uses two EMAs to identify trend direction and momentum.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Macd {
    /// Create a MACD from fast, slow and signal EMA spans.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Result<Self, IndicatorError> {
        if fast >= slow {
            return Err(IndicatorError::InvalidParameter(
                "Fast period must be less than slow period".into(),
            ));
        }
        Ok(Self {
            fast: Ema::new(fast)?,
            slow: Ema::new(slow)?,
            signal: Ema::new(signal)?,
        })
    }
}

impl Indicator for Macd {
    type Output = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Vec<Option<MacdOutput>> {
        let fast = self.fast.smooth(data);
        let slow = self.slow.smooth(data);
        let macd_line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal_line = self.signal.smooth(&macd_line);

        macd_line
            .into_iter()
            .zip(signal_line)
            .map(|(macd, signal)| {
                Some(MacdOutput {
                    macd,
                    signal,
                    histogram: macd - signal,
                })
            })
            .collect()
    }

    fn warmup(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "MACD"
    }
}
