//! Ordered format fallback for Telegram delivery.
//!
//! The text message is what counts as delivery. Once it is accepted, a chart
//! of the signal is sent as a photo on a best-effort basis: a chart that
//! fails to render or upload is logged and does not fail the alert.

use async_trait::async_trait;
use fxsignal_core::error::NotifyError;
use fxsignal_core::traits::Notifier;
use fxsignal_core::types::{Alert, PriceSeries};
use tracing::{info, warn};

use crate::chart::{chart_caption, render_chart, ChartOptions};
use crate::{MessageFormat, TelegramClient};

/// Tries each format in order until one is accepted, then sends the chart.
#[derive(Debug, Clone)]
pub struct FallbackNotifier {
    client: TelegramClient,
    formats: Vec<MessageFormat>,
    chart: Option<ChartOptions>,
}

impl FallbackNotifier {
    /// Markdown, then HTML, then plain text, followed by a default chart.
    pub fn new(client: TelegramClient) -> Self {
        Self::with_formats(client, MessageFormat::FALLBACK_ORDER.to_vec())
    }

    pub fn with_formats(client: TelegramClient, formats: Vec<MessageFormat>) -> Self {
        Self {
            client,
            formats,
            chart: Some(ChartOptions::default()),
        }
    }

    /// Set the chart options, or `None` to send text only.
    pub fn with_chart(mut self, chart: Option<ChartOptions>) -> Self {
        self.chart = chart;
        self
    }

    pub fn formats(&self) -> &[MessageFormat] {
        &self.formats
    }

    pub fn chart(&self) -> Option<&ChartOptions> {
        self.chart.as_ref()
    }

    /// Render the chart for an alert and upload it.
    pub async fn send_chart(
        &self,
        alert: &Alert,
        series: &PriceSeries,
        options: &ChartOptions,
    ) -> Result<(), NotifyError> {
        let png = render_chart(alert, series, options)?;
        self.client.send_photo(png, &chart_caption(alert)).await
    }

    /// Deliver an alert, returning the format that was accepted.
    pub async fn deliver(&self, alert: &Alert) -> Result<MessageFormat, NotifyError> {
        let mut last = String::from("no formats configured");

        for &format in &self.formats {
            let text = format.render(alert);
            match self.client.send_message(&text, format).await {
                Ok(()) => {
                    info!(
                        symbol = %alert.symbol,
                        timeframe = %alert.timeframe,
                        format = format.name(),
                        "Alert sent"
                    );
                    return Ok(format);
                }
                Err(e) => {
                    warn!(format = format.name(), error = %e, "Alert format rejected");
                    last = e.to_string();
                }
            }
        }

        Err(NotifyError::AllFormatsFailed { last })
    }
}

#[async_trait]
impl Notifier for FallbackNotifier {
    async fn notify(&self, alert: &Alert, series: &PriceSeries) -> Result<(), NotifyError> {
        self.deliver(alert).await?;

        if let Some(options) = &self.chart {
            match self.send_chart(alert, series, options).await {
                Ok(()) => info!(symbol = %alert.symbol, timeframe = %alert.timeframe, "Chart sent"),
                Err(e) => warn!(
                    symbol = %alert.symbol,
                    timeframe = %alert.timeframe,
                    error = %e,
                    "Chart not sent"
                ),
            }
        }
        Ok(())
    }

    async fn send_text(&self, text: &str) -> Result<(), NotifyError> {
        self.client.send_message(text, MessageFormat::Plain).await
    }

    fn name(&self) -> &str {
        "telegram"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TelegramConfig;
    use fxsignal_core::types::{Bar, Direction, Signal, SignalKind, Timeframe};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn alert() -> Alert {
        let signal =
            Signal::from_levels("Enhanced Breakout+ATR", SignalKind::Breakout, Direction::Buy, 1.25, 1.24, 2.0)
                .unwrap();
        Alert::new("GBPUSD", Timeframe::Minute15, "FX Bot", signal)
    }

    fn rejected() -> ResponseTemplate {
        ResponseTemplate::new(400).set_body_json(json!({"ok": false, "description": "Bad Request"}))
    }

    fn accepted() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"ok": true}))
    }

    fn series() -> PriceSeries {
        let bars = (0..80)
            .map(|i| {
                let c = 1.24 + 0.0005 * (i as f64 * 0.4).sin();
                Bar::new(i as i64 * 900_000, c, c + 0.0003, c - 0.0003, c)
            })
            .collect();
        PriceSeries::new("GBPUSD", Timeframe::Minute15, bars).unwrap()
    }

    fn notifier(server: &MockServer) -> FallbackNotifier {
        let config = TelegramConfig::new("T", "1").with_base_url(server.uri());
        FallbackNotifier::new(TelegramClient::new(config).unwrap()).with_chart(Some(ChartOptions {
            width: 300,
            height: 200,
            ..Default::default()
        }))
    }

    #[tokio::test]
    async fn test_first_format_wins() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(accepted())
            .expect(1)
            .mount(&server)
            .await;

        let format = notifier(&server).deliver(&alert()).await.unwrap();
        assert_eq!(format, MessageFormat::Markdown);
    }

    #[tokio::test]
    async fn test_falls_back_to_plain_with_real_signal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"parse_mode": "Markdown"})))
            .respond_with(rejected())
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"parse_mode": "HTML"})))
            .respond_with(rejected())
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"text": MessageFormat::Plain.render(&alert())})))
            .respond_with(accepted())
            .expect(1)
            .mount(&server)
            .await;

        let format = notifier(&server).deliver(&alert()).await.unwrap();
        assert_eq!(format, MessageFormat::Plain);
    }

    #[tokio::test]
    async fn test_all_formats_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(rejected())
            .expect(3)
            .mount(&server)
            .await;

        let err = notifier(&server)
            .notify(&alert(), &series())
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::AllFormatsFailed { .. }));
    }

    #[tokio::test]
    async fn test_chart_follows_accepted_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botT/sendMessage"))
            .respond_with(accepted())
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/botT/sendPhoto"))
            .respond_with(accepted())
            .expect(1)
            .mount(&server)
            .await;

        notifier(&server).notify(&alert(), &series()).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].url.path().ends_with("/sendMessage"));
        assert!(requests[1].url.path().ends_with("/sendPhoto"));
        let body = String::from_utf8_lossy(&requests[1].body);
        assert!(body.contains("BUY - Enhanced Breakout+ATR"));
    }

    #[tokio::test]
    async fn test_chart_failure_does_not_fail_alert() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botT/sendMessage"))
            .respond_with(accepted())
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/botT/sendPhoto"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"ok": false})))
            .expect(1)
            .mount(&server)
            .await;

        assert!(notifier(&server).notify(&alert(), &series()).await.is_ok());
    }

    #[tokio::test]
    async fn test_no_chart_when_disabled() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botT/sendMessage"))
            .respond_with(accepted())
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/botT/sendPhoto"))
            .respond_with(accepted())
            .expect(0)
            .mount(&server)
            .await;

        notifier(&server)
            .with_chart(None)
            .notify(&alert(), &series())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_send_text_is_plain() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"text": "FX Bot - Connection Test"})))
            .respond_with(accepted())
            .expect(1)
            .mount(&server)
            .await;

        notifier(&server)
            .send_text("FX Bot - Connection Test")
            .await
            .unwrap();
    }
}
