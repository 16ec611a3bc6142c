//! Telegram Bot API client.

use fxsignal_core::error::NotifyError;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::MessageFormat;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Bot credentials and endpoint.
#[derive(Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub chat_id: String,
    pub api_base_url: String,
}

impl TelegramConfig {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            chat_id: chat_id.into(),
            api_base_url: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.api_base_url = base.into();
        self
    }

    /// Read the token and chat id from the named environment variables.
    pub fn from_env(token_var: &str, chat_id_var: &str) -> Result<Self, NotifyError> {
        let token = std::env::var(token_var)
            .map_err(|_| NotifyError::Configuration(format!("{} not set", token_var)))?;
        let chat_id = std::env::var(chat_id_var)
            .map_err(|_| NotifyError::Configuration(format!("{} not set", chat_id_var)))?;
        Ok(Self::new(token, chat_id))
    }
}

// The token is a secret.
impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("chat_id", &self.chat_id)
            .field("api_base_url", &self.api_base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages to one chat.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    config: TelegramConfig,
    client: Client,
}

impl TelegramClient {
    pub fn new(config: TelegramConfig) -> Result<Self, NotifyError> {
        if config.token.is_empty() || config.chat_id.is_empty() {
            return Err(NotifyError::Configuration(
                "token and chat id must not be empty".into(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NotifyError::Http(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn chat_id(&self) -> &str {
        &self.config.chat_id
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.token,
            method
        )
    }

    /// Send one message.
    pub async fn send_message(&self, text: &str, format: MessageFormat) -> Result<(), NotifyError> {
        let request = SendMessageRequest {
            chat_id: &self.config.chat_id,
            text,
            parse_mode: format.parse_mode(),
        };

        let resp = self
            .client
            .post(self.endpoint("sendMessage"))
            .json(&request)
            .send()
            .await
            .map_err(|e| NotifyError::Http(e.without_url().to_string()))?;

        check_response(resp).await?;
        debug!(format = format.name(), "Message delivered");
        Ok(())
    }

    /// Upload a PNG as a photo with a plain-text caption.
    pub async fn send_photo(&self, png: Vec<u8>, caption: &str) -> Result<(), NotifyError> {
        let bytes = png.len();
        let photo = Part::bytes(png)
            .file_name("signal.png")
            .mime_str("image/png")
            .map_err(|e| NotifyError::Http(e.to_string()))?;
        let form = Form::new()
            .text("chat_id", self.config.chat_id.clone())
            .text("caption", caption.to_string())
            .part("photo", photo);

        let resp = self
            .client
            .post(self.endpoint("sendPhoto"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| NotifyError::Http(e.without_url().to_string()))?;

        check_response(resp).await?;
        debug!(bytes, "Photo delivered");
        Ok(())
    }
}

/// A non-2xx status or `ok: false` is an error.
async fn check_response(resp: Response) -> Result<(), NotifyError> {
    let status = resp.status();
    let body: Option<ApiResponse> = resp.json().await.ok();

    match body {
        Some(ApiResponse { ok: true, .. }) if status.is_success() => Ok(()),
        Some(ApiResponse { description, .. }) => Err(NotifyError::Api {
            status: status.as_u16(),
            description: description.unwrap_or_else(|| "request rejected".into()),
        }),
        None => Err(NotifyError::Api {
            status: status.as_u16(),
            description: "unreadable response body".into(),
        }),
    }
}
