//! In-memory record of delivered alerts.

use chrono::{DateTime, Utc};
use fxsignal_core::types::{Alert, Direction};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One alert as seen by the tracker.
#[derive(Debug, Clone, Serialize)]
pub struct TrackedSignal {
    pub recorded_at: DateTime<Utc>,
    pub alert: Alert,
    /// Whether a sink accepted the alert
    pub delivered: bool,
}

/// Totals over everything still held by the tracker.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackerSummary {
    pub total: usize,
    pub delivered: usize,
    pub buys: usize,
    pub sells: usize,
    pub by_strategy: BTreeMap<String, usize>,
}

/// Bounded history of alerts, oldest evicted first.
#[derive(Debug)]
pub struct SignalTracker {
    entries: Mutex<VecDeque<TrackedSignal>>,
    capacity: usize,
}

impl SignalTracker {
    pub const DEFAULT_CAPACITY: usize = 1000;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<TrackedSignal>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, alert: Alert, delivered: bool) {
        let mut entries = self.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(TrackedSignal {
            recorded_at: Utc::now(),
            alert,
            delivered,
        });
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Up to `n` entries, newest first.
    pub fn recent(&self, n: usize) -> Vec<TrackedSignal> {
        self.lock().iter().rev().take(n).cloned().collect()
    }

    pub fn summary(&self) -> TrackerSummary {
        let entries = self.lock();
        let mut summary = TrackerSummary {
            total: entries.len(),
            ..Default::default()
        };
        for entry in entries.iter() {
            let signal = &entry.alert.signal;
            if entry.delivered {
                summary.delivered += 1;
            }
            match signal.direction {
                Direction::Buy => summary.buys += 1,
                Direction::Sell => summary.sells += 1,
            }
            *summary
                .by_strategy
                .entry(signal.strategy.clone())
                .or_default() += 1;
        }
        summary
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for SignalTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxsignal_core::types::{Signal, SignalKind, Timeframe};

    fn alert(strategy: &str, direction: Direction) -> Alert {
        let stop = if direction == Direction::Buy { 1.09 } else { 1.11 };
        let signal =
            Signal::from_levels(strategy, SignalKind::Ma, direction, 1.1, stop, 2.0).unwrap();
        Alert::new("EURUSD", Timeframe::Hour1, "bot", signal)
    }

    #[test]
    fn test_summary() {
        let tracker = SignalTracker::new();
        tracker.record(alert("A", Direction::Buy), true);
        tracker.record(alert("A", Direction::Sell), false);
        tracker.record(alert("B", Direction::Buy), true);

        let summary = tracker.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.delivered, 2);
        assert_eq!((summary.buys, summary.sells), (2, 1));
        assert_eq!(summary.by_strategy.get("A"), Some(&2));
        assert_eq!(summary.by_strategy.get("B"), Some(&1));
    }

    #[test]
    fn test_recent_is_newest_first() {
        let tracker = SignalTracker::new();
        tracker.record(alert("first", Direction::Buy), true);
        tracker.record(alert("second", Direction::Buy), true);

        let recent = tracker.recent(5);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].alert.signal.strategy, "second");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let tracker = SignalTracker::with_capacity(2);
        for name in ["a", "b", "c"] {
            tracker.record(alert(name, Direction::Sell), true);
        }
        assert_eq!(tracker.len(), 2);
        let names: Vec<String> = tracker
            .recent(2)
            .into_iter()
            .map(|t| t.alert.signal.strategy)
            .collect();
        assert_eq!(names, vec!["c", "b"]);

        tracker.clear();
        assert!(tracker.is_empty());
    }
}
