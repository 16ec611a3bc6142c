//! Volume confirmation.

use fxsignal_core::error::IndicatorError;
use fxsignal_core::traits::Indicator;

use crate::require_period;

/// Current volume over its trailing simple average (inclusive of the current bar).
///
/// Falls back to a neutral 1.0 wherever the average is zero, and
/// [`VolumeRatio::neutral`] stands in for series without volume.
#[derive(Debug, Clone)]
pub struct VolumeRatio {
    period: usize,
}

impl VolumeRatio {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        require_period("VolumeRatio", period, 1)?;
        Ok(Self { period })
    }

    /// Ratio series for a window that carries no volume.
    pub fn neutral(len: usize) -> Vec<Option<f64>> {
        vec![Some(1.0); len]
    }
}

impl Indicator for VolumeRatio {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let period_f64 = self.period as f64;
        let mut result = vec![None; data.len().min(self.period - 1)];

        for window in data.windows(self.period) {
            let average = window.iter().sum::<f64>() / period_f64;
            let current = window[self.period - 1];
            result.push(Some(if average > 0.0 {
                current / average
            } else {
                1.0
            }));
        }

        result
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "VolumeRatio"
    }
}
