//! Trade signals emitted by strategies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Upper bound applied to every confidence score.
pub const MAX_CONFIDENCE: f64 = 100.0;

/// Ranking score used for signals that carry no confidence.
pub const DEFAULT_CONFIDENCE: f64 = 50.0;

/// Cap a heuristic confidence at [`MAX_CONFIDENCE`].
///
/// No lower bound is applied; weak setups may score below zero.
#[inline]
pub fn cap_confidence(raw: f64) -> f64 {
    raw.min(MAX_CONFIDENCE)
}

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    /// +1 for buys, -1 for sells.
    #[inline]
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Buy => 1.0,
            Direction::Sell => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => f.write_str("BUY"),
            Direction::Sell => f.write_str("SELL"),
        }
    }
}

/// Which detector produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Breakout,
    Ma,
    Rsi,
    Atr,
    Sr,
    Fib,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Breakout => "breakout",
            SignalKind::Ma => "ma",
            SignalKind::Rsi => "rsi",
            SignalKind::Atr => "atr",
            SignalKind::Sr => "sr",
            SignalKind::Fib => "fib",
        }
    }
}

/// A trade setup detected on the most recent bar of a series.
///
/// Levels are always direction-consistent: `stop_loss < entry < take_profit`
/// for buys and `take_profit < entry < stop_loss` for sells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Human-readable strategy name
    pub strategy: String,
    /// Detector tag
    pub kind: SignalKind,
    /// Buy or sell
    pub direction: Direction,
    /// Entry price (close of the referenced bar)
    pub entry: f64,
    /// Stop-loss price
    pub stop_loss: f64,
    /// Take-profit price
    pub take_profit: f64,
    /// Index of the referenced bar within the evaluated series
    pub index: usize,
    /// Timestamp of the referenced bar (Unix milliseconds)
    pub timestamp: i64,
    /// Heuristic ranking score, capped at 100 but not floored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Diagnostic values (rsi, volume_ratio, adx, fib_level, ...)
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

impl Signal {
    /// Build a signal from an entry and stop, deriving the take-profit from
    /// the reward:risk ratio.
    ///
    /// Returns `None` when the levels are not direction-consistent, are not
    /// finite, or would place the take-profit at or below zero.
    pub fn from_levels(
        strategy: impl Into<String>,
        kind: SignalKind,
        direction: Direction,
        entry: f64,
        stop_loss: f64,
        rr_ratio: f64,
    ) -> Option<Self> {
        let risk = (entry - stop_loss) * direction.sign();
        let take_profit = entry + risk * rr_ratio * direction.sign();

        let signal = Self {
            strategy: strategy.into(),
            kind,
            direction,
            entry,
            stop_loss,
            take_profit,
            index: 0,
            timestamp: 0,
            confidence: None,
            metrics: BTreeMap::new(),
        };
        signal.levels_consistent().then_some(signal)
    }

    /// Set the referenced bar.
    pub fn at_bar(mut self, index: usize, timestamp: i64) -> Self {
        self.index = index;
        self.timestamp = timestamp;
        self
    }

    /// Set the confidence, capped at [`MAX_CONFIDENCE`].
    pub fn with_confidence(mut self, raw: f64) -> Self {
        self.confidence = Some(cap_confidence(raw));
        self
    }

    /// Attach a diagnostic metric.
    pub fn with_metric(mut self, name: &str, value: f64) -> Self {
        self.metrics.insert(name.to_string(), value);
        self
    }

    /// Look up a diagnostic metric.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    /// Score used to rank signals; falls back to [`DEFAULT_CONFIDENCE`].
    pub fn rank_score(&self) -> f64 {
        self.confidence.unwrap_or(DEFAULT_CONFIDENCE)
    }

    /// Distance from entry to stop-loss.
    pub fn risk(&self) -> f64 {
        (self.entry - self.stop_loss).abs()
    }

    /// Distance from entry to take-profit.
    pub fn reward(&self) -> f64 {
        (self.take_profit - self.entry).abs()
    }

    /// Reward over risk, or 0 when risk is zero.
    pub fn reward_risk(&self) -> f64 {
        let risk = self.risk();
        if risk > 0.0 {
            self.reward() / risk
        } else {
            0.0
        }
    }

    /// Check the ordering invariant between entry, stop and target.
    pub fn levels_consistent(&self) -> bool {
        let finite = [self.entry, self.stop_loss, self.take_profit]
            .iter()
            .all(|v| v.is_finite());
        let ordered = match self.direction {
            Direction::Buy => self.stop_loss < self.entry && self.entry < self.take_profit,
            Direction::Sell => self.take_profit < self.entry && self.entry < self.stop_loss,
        };
        finite && ordered && self.take_profit > 0.0 && self.stop_loss > 0.0
    }
}
