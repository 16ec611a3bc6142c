//! Indicator trait definitions.

use crate::error::IndicatorError;

/// Trait for technical indicators.
///
/// Output is aligned with the input: `calculate(data).len() == data.len()`,
/// with `None` wherever the indicator is not yet warmed up.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output: Copy;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Option<Self::Output>>;

    /// Number of data points needed before the first defined value.
    fn warmup(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Most recent defined value, if any.
    fn latest(&self, data: &[f64]) -> Option<Self::Output> {
        self.calculate(data).last().copied().flatten()
    }

    /// Validate that there's enough data.
    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if data.len() < self.warmup() {
            return Err(IndicatorError::InsufficientData {
                required: self.warmup(),
                available: data.len(),
            });
        }
        Ok(())
    }
}
