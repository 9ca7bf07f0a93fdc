//! Telegram Bot API notifier.

use async_trait::async_trait;
use reqwest::Client;
use resonance_core::error::NotifyError;
use resonance_core::traits::Notifier;
use resonance_core::types::Alert;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::format::format_message;

/// Bot API host.
pub const DEFAULT_TELEGRAM_URL: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Delivers alerts through `sendMessage`.
pub struct TelegramNotifier {
    client: Client,
    base_url: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// `connect_timeout` bounds connection setup only; the whole send is
    /// bounded by the dispatcher, whose limit can change on reload.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
        connect_timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let token = token.into();
        let chat_id = chat_id.into();
        if token.trim().is_empty() || chat_id.trim().is_empty() {
            return Err(NotifyError::Configuration(
                "Telegram bot token and chat id must be non-empty".into(),
            ));
        }

        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| NotifyError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            chat_id,
        })
    }

    /// Read the token and chat id from the named environment variables.
    pub fn from_env(
        base_url: impl Into<String>,
        token_var: &str,
        chat_id_var: &str,
        connect_timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let token = std::env::var(token_var)
            .map_err(|_| NotifyError::Configuration(format!("{} not set", token_var)))?;
        let chat_id = std::env::var(chat_id_var)
            .map_err(|_| NotifyError::Configuration(format!("{} not set", chat_id_var)))?;
        Self::new(base_url, token, chat_id, connect_timeout)
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.base_url, self.token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        let text = format_message(alert);
        let body = SendMessageRequest {
            chat_id: &self.chat_id,
            text: &text,
            disable_web_page_preview: true,
        };

        let resp = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            // The URL embeds the token; keep it out of the error text.
            .map_err(|e| NotifyError::Connection(e.without_url().to_string()))?;

        let status = resp.status();
        let parsed: Result<SendMessageResponse, _> = resp.json().await;

        match parsed {
            Ok(r) if r.ok && status.is_success() => {
                debug!(symbol = %alert.symbol, "Telegram message delivered");
                Ok(())
            }
            Ok(r) => Err(NotifyError::Rejected(
                r.description.unwrap_or_else(|| status.to_string()),
            )),
            Err(_) => Err(NotifyError::Rejected(status.to_string())),
        }
    }

    fn name(&self) -> &str {
        "telegram"
    }
}
