//! Telegram Bot API transport.
//!
//! Posts messages through `sendMessage` with HTML parse mode. Every call is bounded
//! by the client timeout, so a slow or unreachable API cannot hold a request.

use super::MessageSender;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

/// `MessageSender` backed by the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct TelegramSender {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl TelegramSender {
    /// Builds a sender for `bot_token` against `api_base` with a per-call `timeout`.
    pub fn new(api_base: &str, bot_token: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let payload = SendMessage {
            chat_id,
            text,
            parse_mode: "HTML",
        };

        self.client
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Error::Notification {
                // Drop the URL: it carries the bot token
                message: e.without_url().to_string(),
            })?;

        tracing::debug!(chat_id, "Notification delivered");
        Ok(())
    }
}
