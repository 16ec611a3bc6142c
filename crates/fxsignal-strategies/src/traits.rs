//! Strategy trait definitions.

use fxsignal_core::error::StrategyError;
use fxsignal_core::types::{PriceSeries, Signal, SignalKind};
use fxsignal_indicators::IndicatorSet;

/// Core strategy trait.
///
/// A strategy inspects the most recent bar of a series (using earlier bars
/// only for warm-up) and reports at most one signal. Evaluation is pure:
/// the same series always yields the same result.
pub trait Strategy: Send + Sync {
    /// Human-readable name carried on every signal.
    fn name(&self) -> &str;

    /// Detector tag carried on every signal.
    fn kind(&self) -> SignalKind;

    /// Get the strategy description.
    fn description(&self) -> &str;

    /// Bars needed before the strategy can trigger. Shorter series yield
    /// `Ok(None)`.
    fn warmup_period(&self) -> usize;

    /// Evaluate against a shared indicator cache.
    ///
    /// # Returns
    /// * `Ok(Some(signal))` when the setup triggered on the last bar
    /// * `Ok(None)` when it did not, or there is not enough history
    /// * `Err(_)` when the strategy could not be evaluated at all
    ///
    /// Implementations must not panic. Faults are reported as `Err` so the
    /// aggregator can record them and keep evaluating the other strategies.
    fn evaluate(&self, indicators: &IndicatorSet<'_>) -> Result<Option<Signal>, StrategyError>;

    /// Evaluate a series with a private indicator cache.
    fn evaluate_series(&self, series: &PriceSeries) -> Result<Option<Signal>, StrategyError> {
        self.evaluate(&IndicatorSet::new(series))
    }
}

/// Index of the last bar and its timestamp, once `warmup` bars exist.
pub(crate) fn last_bar(indicators: &IndicatorSet<'_>, warmup: usize) -> Option<(usize, i64)> {
    if indicators.len() < warmup.max(1) {
        return None;
    }
    let idx = indicators.last_index()?;
    let timestamp = indicators.series().get(idx)?.timestamp;
    Some((idx, timestamp))
}
