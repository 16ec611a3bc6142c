//! Rolling extrema.

use fxsignal_core::error::IndicatorError;
use fxsignal_core::traits::Indicator;

use crate::require_period;

/// Highest value of the trailing `window` values, inclusive of the current one.
#[derive(Debug, Clone)]
pub struct RollingMax {
    window: usize,
}

impl RollingMax {
    pub fn new(window: usize) -> Result<Self, IndicatorError> {
        require_period("RollingMax", window, 1)?;
        Ok(Self { window })
    }
}

impl Indicator for RollingMax {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        rolling(data, self.window, f64::max)
    }

    fn warmup(&self) -> usize {
        self.window
    }

    fn name(&self) -> &str {
        "RollingMax"
    }
}

/// Lowest value of the trailing `window` values, inclusive of the current one.
#[derive(Debug, Clone)]
pub struct RollingMin {
    window: usize,
}

impl RollingMin {
    pub fn new(window: usize) -> Result<Self, IndicatorError> {
        require_period("RollingMin", window, 1)?;
        Ok(Self { window })
    }
}

impl Indicator for RollingMin {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        rolling(data, self.window, f64::min)
    }

    fn warmup(&self) -> usize {
        self.window
    }

    fn name(&self) -> &str {
        "RollingMin"
    }
}

fn rolling(data: &[f64], window: usize, pick: fn(f64, f64) -> f64) -> Vec<Option<f64>> {
    let mut result = vec![None; data.len().min(window - 1)];
    result.extend(
        data.windows(window)
            .map(|w| w.iter().copied().reduce(pick)),
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_max_inclusive() {
        let max = RollingMax::new(3).unwrap();
        let result = max.calculate(&[1.0, 5.0, 2.0, 3.0, 4.0, 0.5]);

        assert_eq!(
            result,
            vec![None, None, Some(5.0), Some(5.0), Some(4.0), Some(4.0)]
        );
    }

    #[test]
    fn test_rolling_min_inclusive() {
        let min = RollingMin::new(2).unwrap();
        let result = min.calculate(&[3.0, 1.0, 2.0, 4.0]);

        assert_eq!(result, vec![None, Some(1.0), Some(1.0), Some(2.0)]);
    }

    #[test]
    fn test_window_longer_than_data() {
        let max = RollingMax::new(10).unwrap();
        assert_eq!(max.calculate(&[1.0, 2.0]), vec![None, None]);
        assert!(RollingMin::new(0).is_err());
    }
}
