//! Notification sink trait.

use crate::error::NotifyError;
use crate::types::{Alert, PriceSeries};
use async_trait::async_trait;

/// Delivers alerts to a human.
///
/// A failing sink must never abort evaluation of other symbols; callers log
/// and carry on.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Present one alert together with the bars it was found on.
    async fn notify(&self, alert: &Alert, series: &PriceSeries) -> Result<(), NotifyError>;

    /// Send free-form text (connectivity checks, operator notices).
    async fn send_text(&self, text: &str) -> Result<(), NotifyError>;

    /// Get the sink name.
    fn name(&self) -> &str;
}
