//! Scan results.

use chrono::{DateTime, Utc};
use fxsignal_core::types::{Direction, Timeframe};
use serde::{Deserialize, Serialize};

/// What happened to one symbol/timeframe pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PairOutcome {
    /// The best signal was found and handed to the notifier
    Signal {
        strategy: String,
        direction: Direction,
        entry: f64,
        confidence: Option<f64>,
        /// Signals triggered on this pair, including the best
        candidates: usize,
        delivered: bool,
    },
    NoSignal,
    Insufficient { bars: usize, required: usize },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairReport {
    pub symbol: String,
    pub timeframe: Timeframe,
    #[serde(flatten)]
    pub outcome: PairOutcome,
}

/// Counts over one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Pairs that reached strategy evaluation
    pub analyzed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub signals_found: usize,
    pub alerts_sent: usize,
}

/// Report of one scan pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub summary: ScanSummary,
    pub pairs: Vec<PairReport>,
}

impl ScanReport {
    pub fn new(started_at: DateTime<Utc>, finished_at: DateTime<Utc>, pairs: Vec<PairReport>) -> Self {
        let mut summary = ScanSummary::default();
        for pair in &pairs {
            match &pair.outcome {
                PairOutcome::Signal { delivered, .. } => {
                    summary.analyzed += 1;
                    summary.signals_found += 1;
                    if *delivered {
                        summary.alerts_sent += 1;
                    }
                }
                PairOutcome::NoSignal => summary.analyzed += 1,
                PairOutcome::Insufficient { .. } => summary.skipped += 1,
                PairOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        Self {
            started_at,
            finished_at,
            summary,
            pairs,
        }
    }

    /// Generate a text summary.
    pub fn summary_text(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                        SCAN REPORT                         \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!(
            "  Started:             {}\n",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        s.push_str(&format!(
            "  Duration:            {:.1}s\n",
            (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
        ));
        s.push_str(&format!("  Pairs Analyzed:      {}\n", self.summary.analyzed));
        s.push_str(&format!("  Pairs Skipped:       {}\n", self.summary.skipped));
        s.push_str(&format!("  Pairs Failed:        {}\n", self.summary.failed));
        s.push_str(&format!("  Signals Found:       {}\n", self.summary.signals_found));
        s.push_str(&format!("  Alerts Sent:         {}\n", self.summary.alerts_sent));
        s.push('\n');

        s.push_str("PAIRS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        for pair in &self.pairs {
            let detail = match &pair.outcome {
                PairOutcome::Signal {
                    strategy,
                    direction,
                    entry,
                    confidence,
                    delivered,
                    ..
                } => format!(
                    "{} {} @ {:.5} ({}){}",
                    direction,
                    strategy,
                    entry,
                    confidence.map_or_else(|| "n/a".to_string(), |c| format!("{:.1}%", c)),
                    if *delivered { "" } else { " [not delivered]" }
                ),
                PairOutcome::NoSignal => "no signal".to_string(),
                PairOutcome::Insufficient { bars, required } => {
                    format!("insufficient data ({} of {} bars)", bars, required)
                }
                PairOutcome::Failed { error } => format!("failed: {}", error),
            };
            s.push_str(&format!(
                "  {:<8} {:<4} {}\n",
                pair.symbol,
                pair.timeframe.label(),
                detail
            ));
        }

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(symbol: &str, outcome: PairOutcome) -> PairReport {
        PairReport {
            symbol: symbol.into(),
            timeframe: Timeframe::Hour1,
            outcome,
        }
    }

    fn report() -> ScanReport {
        let now = Utc::now();
        ScanReport::new(
            now,
            now,
            vec![
                pair(
                    "EURUSD",
                    PairOutcome::Signal {
                        strategy: "Enhanced Breakout+ATR".into(),
                        direction: Direction::Buy,
                        entry: 1.08512,
                        confidence: Some(61.27),
                        candidates: 2,
                        delivered: true,
                    },
                ),
                pair("GBPUSD", PairOutcome::NoSignal),
                pair("USDJPY", PairOutcome::Insufficient { bars: 12, required: 50 }),
                pair("AUDUSD", PairOutcome::Failed { error: "timeout".into() }),
            ],
        )
    }

    #[test]
    fn test_summary_counts() {
        let summary = report().summary;
        assert_eq!(
            summary,
            ScanSummary {
                analyzed: 2,
                skipped: 1,
                failed: 1,
                signals_found: 1,
                alerts_sent: 1,
            }
        );
    }

    #[test]
    fn test_summary_text() {
        let text = report().summary_text();
        assert!(text.contains("Signals Found:       1"));
        assert!(text.contains("BUY Enhanced Breakout+ATR @ 1.08512 (61.3%)"));
        assert!(text.contains("insufficient data (12 of 50 bars)"));
        assert!(text.contains("failed: timeout"));
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&report().to_json().unwrap()).unwrap();
        assert_eq!(json["summary"]["analyzed"], 2);
        assert_eq!(json["pairs"][0]["status"], "signal");
        assert_eq!(json["pairs"][0]["direction"], "buy");
        assert_eq!(json["pairs"][0]["timeframe"], "1h");
        assert_eq!(json["pairs"][2]["status"], "insufficient");
    }
}
