//! Scan driver.

use chrono::Utc;
use fxsignal_core::traits::{MarketDataProvider, Notifier};
use fxsignal_core::types::{Alert, Timeframe};
use fxsignal_monitor::SignalTracker;
use fxsignal_strategies::SignalAggregator;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::{PairOutcome, PairReport, ScanReport, ScannerConfig};

/// Fetches, evaluates and alerts for every configured pair.
pub struct Scanner {
    config: ScannerConfig,
    provider: Arc<dyn MarketDataProvider>,
    notifier: Arc<dyn Notifier>,
    aggregator: SignalAggregator,
    tracker: Arc<SignalTracker>,
    bot_name: String,
}

impl Scanner {
    pub fn new(
        config: ScannerConfig,
        provider: Arc<dyn MarketDataProvider>,
        notifier: Arc<dyn Notifier>,
        aggregator: SignalAggregator,
    ) -> Self {
        Self {
            config,
            provider,
            notifier,
            aggregator,
            tracker: Arc::new(SignalTracker::new()),
            bot_name: "FX Signal Bot".to_string(),
        }
    }

    pub fn with_bot_name(mut self, name: impl Into<String>) -> Self {
        self.bot_name = name.into();
        self
    }

    pub fn with_tracker(mut self, tracker: Arc<SignalTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn tracker(&self) -> &Arc<SignalTracker> {
        &self.tracker
    }

    /// Run one pass over every pair, sequentially.
    pub async fn scan_once(&self) -> ScanReport {
        let started_at = Utc::now();
        info!(
            pairs = self.config.symbols.len() * self.config.timeframes.len(),
            provider = self.provider.name(),
            notifier = self.notifier.name(),
            "Starting scan"
        );

        let mut pairs = Vec::new();
        for (i, (symbol, timeframe)) in self.config.pairs().enumerate() {
            if i > 0 && self.config.request_delay_ms > 0 {
                tokio::time::sleep(self.config.request_delay()).await;
            }
            let outcome = self.scan_pair(symbol, timeframe).await;
            pairs.push(PairReport {
                symbol: symbol.to_string(),
                timeframe,
                outcome,
            });
        }

        let report = ScanReport::new(started_at, Utc::now(), pairs);
        info!(
            analyzed = report.summary.analyzed,
            skipped = report.summary.skipped,
            failed = report.summary.failed,
            signals = report.summary.signals_found,
            alerts = report.summary.alerts_sent,
            "Scan completed"
        );
        report
    }

    /// Evaluate one pair and alert on its best signal.
    pub async fn scan_pair(&self, symbol: &str, timeframe: Timeframe) -> PairOutcome {
        let series = match self
            .provider
            .fetch_recent(symbol, timeframe, self.config.candles)
            .await
        {
            Ok(series) => series,
            Err(e) => {
                error!(symbol, %timeframe, error = %e, "Failed to fetch bars");
                return PairOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        if series.len() < self.config.min_bars {
            warn!(symbol, %timeframe, bars = series.len(), "Insufficient data");
            return PairOutcome::Insufficient {
                bars: series.len(),
                required: self.config.min_bars,
            };
        }

        let aggregate = self.aggregator.evaluate(&series);
        let candidates = aggregate.signals.len();
        let Some(best) = aggregate.signals.into_iter().next() else {
            info!(symbol, %timeframe, "No signals");
            return PairOutcome::NoSignal;
        };
        info!(
            symbol,
            %timeframe,
            candidates,
            strategy = %best.strategy,
            direction = %best.direction,
            "Signal found"
        );

        let alert = Alert::new(symbol, timeframe, self.bot_name.as_str(), best);
        let delivered = match self.notifier.notify(&alert, &series).await {
            Ok(()) => true,
            Err(e) => {
                error!(symbol, %timeframe, error = %e, "Failed to deliver alert");
                false
            }
        };

        let outcome = PairOutcome::Signal {
            strategy: alert.signal.strategy.clone(),
            direction: alert.signal.direction,
            entry: alert.signal.entry,
            confidence: alert.signal.confidence,
            candidates,
            delivered,
        };
        self.tracker.record(alert, delivered);
        outcome
    }

    /// Scan on a fixed interval until `shutdown` resolves. The first pass
    /// starts immediately.
    pub async fn run_until<F>(&self, interval: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping scanner");
                    break;
                }
                _ = ticker.tick() => {
                    self.scan_once().await;
                    info!(next_in_secs = interval.as_secs(), "Waiting for next scan");
                }
            }
        }
    }

    /// Scan on a fixed interval until Ctrl-C.
    pub async fn run(&self, interval: Duration) {
        self.run_until(interval, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await;
    }
}
