//! Moving average indicators.

use fxsignal_core::error::IndicatorError;
use fxsignal_core::traits::Indicator;

use crate::require_period;

/// Trailing mean over `period` values ending at each index.
///
/// A window containing any undefined value is itself undefined, so gaps in
/// an upstream series propagate instead of being averaged over.
pub fn rolling_mean(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }
    let period_f64 = period as f64;

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            values[i + 1 - period..=i]
                .iter()
                .try_fold(0.0, |sum, v| v.map(|v| sum + v))
                .map(|sum| sum / period_f64)
        })
        .collect()
}

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        require_period("SMA", period, 1)?;
        Ok(Self { period })
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let values: Vec<Option<f64>> = data.iter().copied().map(Some).collect();
        rolling_mean(&values, self.period)
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Smoothing factor `2 / (span + 1)`, seeded with the first value rather than
/// an initial SMA, so it is defined from the first bar onward.
#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
}

impl Ema {
    /// Create a new EMA with the specified span.
    pub fn new(span: usize) -> Result<Self, IndicatorError> {
        require_period("EMA", span, 1)?;
        Ok(Self {
            alpha: 2.0 / (span as f64 + 1.0),
        })
    }

    /// Run the recursion over plain values.
    pub fn smooth(&self, data: &[f64]) -> Vec<f64> {
        let mut result = Vec::with_capacity(data.len());
        let one_minus_alpha = 1.0 - self.alpha;

        if let Some((&first, rest)) = data.split_first() {
            let mut ema = first;
            result.push(ema);
            for &value in rest {
                ema = value * self.alpha + ema * one_minus_alpha;
                result.push(ema);
            }
        }

        result
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        self.smooth(data).into_iter().map(Some).collect()
    }

    fn warmup(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma() {
        let sma = Sma::new(3).unwrap();
        let result = sma.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(result.len(), 5);
        assert!(result[0].is_none() && result[1].is_none());
        assert!((result[2].unwrap() - 2.0).abs() < 1e-10); // (1+2+3)/3
        assert!((result[3].unwrap() - 3.0).abs() < 1e-10); // (2+3+4)/3
        assert!((result[4].unwrap() - 4.0).abs() < 1e-10); // (3+4+5)/3
    }

    #[test]
    fn test_sma_insufficient_data() {
        let sma = Sma::new(5).unwrap();
        let result = sma.calculate(&[1.0, 2.0, 3.0]);

        assert!(result.iter().all(Option::is_none));
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(Sma::new(0).is_err());
        assert!(Ema::new(0).is_err());
    }

    #[test]
    fn test_rolling_mean_propagates_gaps() {
        let values = [None, Some(2.0), Some(4.0), Some(6.0)];
        let result = rolling_mean(&values, 2);

        assert_eq!(result, vec![None, None, Some(3.0), Some(5.0)]);
    }

    #[test]
    fn test_ema_seeded_with_first_value() {
        let ema = Ema::new(3).unwrap();
        let result = ema.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        // alpha = 2/(3+1) = 0.5
        assert_eq!(result[0], Some(1.0));
        assert!((result[1].unwrap() - 1.5).abs() < 1e-10);
        assert!((result[2].unwrap() - 2.25).abs() < 1e-10);
        assert!((result[4].unwrap() - 4.0625).abs() < 1e-10);
    }

    #[test]
    fn test_ema_empty() {
        let ema = Ema::new(10).unwrap();
        assert!(ema.calculate(&[]).is_empty());
    }
}
