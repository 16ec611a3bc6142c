//! Dry-run sink.

use async_trait::async_trait;
use fxsignal_core::error::NotifyError;
use fxsignal_core::traits::Notifier;
use fxsignal_core::types::{Alert, PriceSeries};
use tracing::info;

use crate::MessageFormat;

/// Logs the plain-text rendering instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, alert: &Alert, series: &PriceSeries) -> Result<(), NotifyError> {
        info!(
            symbol = %alert.symbol,
            timeframe = %alert.timeframe,
            bars = series.len(),
            strategy = %alert.signal.strategy,
            message = %MessageFormat::Plain.render(alert),
            "Dry run: alert not sent"
        );
        Ok(())
    }

    async fn send_text(&self, text: &str) -> Result<(), NotifyError> {
        info!(text, "Dry run: message not sent");
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
