//! Runs every strategy over one series and ranks the results.

use fxsignal_core::types::{PriceSeries, Signal};
use fxsignal_indicators::IndicatorSet;
use tracing::{debug, warn};

use crate::{
    BreakoutStrategy, FibonacciStrategy, MACrossoverStrategy, RsiReversalStrategy, Strategy,
    SupportResistanceStrategy, TrendAtrStrategy,
};

/// A strategy that errored during evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyFailure {
    pub strategy: String,
    pub error: String,
}

/// Outcome of one aggregation pass.
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    /// Triggered signals, highest confidence first
    pub signals: Vec<Signal>,
    /// Strategies that failed and were skipped
    pub failures: Vec<StrategyFailure>,
}

impl Aggregate {
    /// Highest-ranked signal, if any.
    pub fn best(&self) -> Option<&Signal> {
        self.signals.first()
    }
}

/// Fans a series out to a fixed list of strategies.
///
/// Strategies share one indicator cache per pass. A failing strategy is
/// logged and skipped; it never hides the others' signals.
pub struct SignalAggregator {
    strategies: Vec<Box<dyn Strategy>>,
}

impl SignalAggregator {
    pub fn new(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    /// All six built-in strategies with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(vec![
            Box::new(MACrossoverStrategy::default()),
            Box::new(RsiReversalStrategy::default()),
            Box::new(BreakoutStrategy::default()),
            Box::new(TrendAtrStrategy::default()),
            Box::new(SupportResistanceStrategy::default()),
            Box::new(FibonacciStrategy::default()),
        ])
    }

    pub fn strategies(&self) -> &[Box<dyn Strategy>] {
        &self.strategies
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Evaluate every strategy, collecting signals and failures.
    pub fn evaluate(&self, series: &PriceSeries) -> Aggregate {
        self.evaluate_with(&IndicatorSet::new(series))
    }

    /// Evaluate against an existing indicator cache.
    pub fn evaluate_with(&self, indicators: &IndicatorSet<'_>) -> Aggregate {
        let mut aggregate = Aggregate::default();

        for strategy in &self.strategies {
            match strategy.evaluate(indicators) {
                Ok(Some(signal)) => {
                    debug!(
                        strategy = strategy.name(),
                        direction = %signal.direction,
                        entry = signal.entry,
                        confidence = ?signal.confidence,
                        "Signal triggered"
                    );
                    aggregate.signals.push(signal);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        strategy = strategy.name(),
                        symbol = %indicators.series().symbol,
                        error = %e,
                        "Strategy evaluation failed"
                    );
                    aggregate.failures.push(StrategyFailure {
                        strategy: strategy.name().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        // Stable: ties keep strategy order
        aggregate
            .signals
            .sort_by(|a, b| b.rank_score().total_cmp(&a.rank_score()));
        aggregate
    }

    /// Triggered signals, highest confidence first.
    pub fn run(&self, series: &PriceSeries) -> Vec<Signal> {
        self.evaluate(series).signals
    }

    /// The single best signal for a series.
    pub fn best(&self, series: &PriceSeries) -> Option<Signal> {
        self.run(series).into_iter().next()
    }
}

impl Default for SignalAggregator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{from_closes, series};
    use crate::{RsiReversalConfig, RsiReversalStrategy};
    use fxsignal_core::error::StrategyError;
    use fxsignal_core::types::{Direction, SignalKind};

    /// Buys every last bar with a fixed 1% stop.
    struct AlwaysBuy;

    impl Strategy for AlwaysBuy {
        fn name(&self) -> &str {
            "Always Buy"
        }

        fn kind(&self) -> SignalKind {
            SignalKind::Breakout
        }

        fn description(&self) -> &str {
            "test strategy"
        }

        fn warmup_period(&self) -> usize {
            1
        }

        fn evaluate(&self, indicators: &IndicatorSet<'_>) -> Result<Option<Signal>, StrategyError> {
            let price = indicators.series().last().map(|b| b.close).unwrap_or(1.0);
            Ok(Signal::from_levels(
                self.name(),
                self.kind(),
                Direction::Buy,
                price,
                price * 0.99,
                2.0,
            ))
        }
    }

    struct Faulty;

    impl Strategy for Faulty {
        fn name(&self) -> &str {
            "Faulty"
        }

        fn kind(&self) -> SignalKind {
            SignalKind::Rsi
        }

        fn description(&self) -> &str {
            "test strategy"
        }

        fn warmup_period(&self) -> usize {
            1
        }

        fn evaluate(&self, _: &IndicatorSet<'_>) -> Result<Option<Signal>, StrategyError> {
            Err(StrategyError::Internal("bad state".into()))
        }
    }

    #[test]
    fn test_default_order() {
        let aggregator = SignalAggregator::with_defaults();
        let names: Vec<&str> = aggregator.strategies().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "Enhanced MA+RSI Crossover",
                "Enhanced RSI Reversal",
                "Enhanced Breakout+ATR",
                "Enhanced Trend+ATR",
                "Enhanced Support/Resistance",
                "Enhanced Fibonacci",
            ]
        );
    }

    #[test]
    fn test_flat_series_is_silent() {
        let series = series(from_closes(&[1.1; 300], 0.0005));
        let aggregate = SignalAggregator::with_defaults().evaluate(&series);
        assert!(aggregate.signals.is_empty());
        assert!(aggregate.failures.is_empty());
        assert!(aggregate.best().is_none());
    }

    #[test]
    fn test_empty_aggregator() {
        let aggregator = SignalAggregator::new(Vec::new());
        assert!(aggregator.is_empty());
        let series = series(from_closes(&[1.1; 10], 0.0005));
        assert!(aggregator.run(&series).is_empty());
    }

    #[test]
    fn test_failures_are_isolated() {
        let aggregator = SignalAggregator::new(vec![
            Box::new(Faulty),
            // Period 0 surfaces as an indicator error, not a panic
            Box::new(RsiReversalStrategy::new(RsiReversalConfig {
                rsi_period: 0,
                ..Default::default()
            })),
            Box::new(AlwaysBuy),
        ]);
        let series = series(from_closes(&[1.1; 300], 0.0005));

        let aggregate = aggregator.evaluate(&series);

        assert_eq!(aggregate.failures.len(), 2);
        assert_eq!(aggregate.failures[0].strategy, "Faulty");
        assert!(aggregate.failures[0].error.contains("bad state"));
        assert_eq!(aggregate.failures[1].strategy, "Enhanced RSI Reversal");
        assert_eq!(aggregate.signals.len(), 1);
        assert_eq!(aggregate.best().unwrap().strategy, "Always Buy");
    }
}
