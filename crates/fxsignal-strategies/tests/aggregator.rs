//! Aggregation behavior across the built-in strategies.

use fxsignal_core::error::StrategyError;
use fxsignal_core::types::{Bar, Direction, PriceSeries, Signal, SignalKind, Timeframe};
use fxsignal_indicators::IndicatorSet;
use fxsignal_strategies::{BreakoutStrategy, SignalAggregator, Strategy, StrategyRegistry};

fn hourly(closes: &[f64], half_range: f64) -> PriceSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::new(i as i64 * 3_600_000, c, c + half_range, c - half_range, c))
        .collect();
    PriceSeries::new("EURUSD", Timeframe::Hour1, bars).unwrap()
}

/// 300 bars rising 0.0001 per bar with the close at the high, then a
/// 0.0008 jump on the last bar with 1.6x volume.
fn rising_breakout() -> PriceSeries {
    let mut closes: Vec<f64> = (0..299).map(|i| 1.1 + 0.0001 * i as f64).collect();
    closes.push(closes[298] + 0.0008);
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let volume = if i == 299 { 1600.0 } else { 1000.0 };
            Bar::new(i as i64 * 3_600_000, c, c, c - 0.001, c).with_volume(volume)
        })
        .collect();
    PriceSeries::new("EURUSD", Timeframe::Hour1, bars).unwrap()
}

struct Failing;

impl Strategy for Failing {
    fn name(&self) -> &str {
        "Failing"
    }

    fn kind(&self) -> SignalKind {
        SignalKind::Ma
    }

    fn description(&self) -> &str {
        "always errors"
    }

    fn warmup_period(&self) -> usize {
        1
    }

    fn evaluate(&self, _: &IndicatorSet<'_>) -> Result<Option<Signal>, StrategyError> {
        Err(StrategyError::Internal("boom".into()))
    }
}

/// Emits a buy at the last close with a fixed confidence.
struct Fixed {
    name: &'static str,
    confidence: Option<f64>,
}

impl Strategy for Fixed {
    fn name(&self) -> &str {
        self.name
    }

    fn kind(&self) -> SignalKind {
        SignalKind::Sr
    }

    fn description(&self) -> &str {
        "fixed"
    }

    fn warmup_period(&self) -> usize {
        1
    }

    fn evaluate(&self, indicators: &IndicatorSet<'_>) -> Result<Option<Signal>, StrategyError> {
        let Some(bar) = indicators.series().last() else {
            return Ok(None);
        };
        let signal = Signal::from_levels(
            self.name,
            SignalKind::Sr,
            Direction::Buy,
            bar.close,
            bar.close * 0.99,
            2.0,
        );
        Ok(match self.confidence {
            Some(c) => signal.map(|s| s.with_confidence(c)),
            None => signal,
        })
    }
}

#[test]
fn test_breakout_worked_example() {
    let series = rising_breakout();
    let closes = series.closes();

    let signal = BreakoutStrategy::default()
        .evaluate_series(&series)
        .unwrap()
        .expect("breakout should trigger");

    assert_eq!(signal.direction, Direction::Buy);
    assert_eq!(signal.entry, closes[299]);
    assert!((signal.stop_loss - (closes[298] - 0.0005)).abs() < 1e-9);
    assert!((signal.metric("atr").unwrap() - 0.001).abs() < 1e-9);
    // 0.8 ATR of breakout plus a 1600/1030 volume ratio
    let expected = 0.8 * 20.0 + 1600.0 / 1030.0 * 10.0;
    assert!((signal.confidence.unwrap() - expected).abs() < 1e-6);
}

#[test]
fn test_aggregator_includes_breakout() {
    let signals = SignalAggregator::with_defaults().run(&rising_breakout());
    assert!(signals.iter().any(|s| s.kind == SignalKind::Breakout));
    for pair in signals.windows(2) {
        assert!(pair[0].rank_score() >= pair[1].rank_score());
    }
}

#[test]
fn test_failing_strategy_is_isolated() {
    let aggregator = SignalAggregator::new(vec![
        Box::new(Failing),
        Box::new(BreakoutStrategy::default()),
    ]);
    let aggregate = aggregator.evaluate(&rising_breakout());

    assert_eq!(aggregate.signals.len(), 1);
    assert_eq!(aggregate.failures.len(), 1);
    assert_eq!(aggregate.failures[0].strategy, "Failing");
    assert!(aggregate.failures[0].error.contains("boom"));
}

#[test]
fn test_sort_is_descending_and_stable() {
    let aggregator = SignalAggregator::new(vec![
        Box::new(Fixed { name: "low", confidence: Some(10.0) }),
        Box::new(Fixed { name: "unscored", confidence: None }),
        Box::new(Fixed { name: "tie", confidence: Some(50.0) }),
        Box::new(Fixed { name: "high", confidence: Some(150.0) }),
    ]);
    let series = hourly(&[1.1, 1.2, 1.3], 0.001);
    let names: Vec<String> = aggregator
        .run(&series)
        .into_iter()
        .map(|s| s.strategy)
        .collect();

    // Unscored ranks as 50 and keeps its place ahead of the tie
    assert_eq!(names, vec!["high", "unscored", "tie", "low"]);
    assert_eq!(aggregator.best(&series).unwrap().confidence, Some(100.0));
}

#[test]
fn test_short_history_is_silent() {
    let series = hourly(&[1.1, 1.101, 1.102, 1.103, 1.104], 0.0005);
    let aggregate = SignalAggregator::with_defaults().evaluate(&series);
    assert!(aggregate.signals.is_empty());
    assert!(aggregate.failures.is_empty());
}

#[test]
fn test_flat_series_is_silent() {
    let series = hourly(&[1.2345; 300], 0.0);
    assert!(SignalAggregator::with_defaults().run(&series).is_empty());
}

#[test]
fn test_signals_satisfy_level_invariants() {
    let closes: Vec<f64> = (0..400)
        .map(|i| 1.1 + 0.01 * (i as f64 / 15.0).sin() + 0.00002 * i as f64)
        .collect();
    let registry = StrategyRegistry::new();
    let aggregator = SignalAggregator::new(registry.create_all().unwrap());

    for len in (60..=closes.len()).step_by(7) {
        let series = hourly(&closes[..len], 0.0008);
        for signal in aggregator.run(&series) {
            assert!(signal.levels_consistent(), "{:?}", signal);
            assert_eq!(signal.index, len - 1);
            assert!(signal.confidence.map_or(true, |c| c <= 100.0));
        }
    }
}

#[test]
fn test_evaluation_is_deterministic() {
    let series = rising_breakout();
    let aggregator = SignalAggregator::with_defaults();
    assert_eq!(aggregator.run(&series), aggregator.run(&series));
}
