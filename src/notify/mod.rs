//! Notification gateway - best-effort text messages to the staff chat.
//!
//! `MessageSender` is the transport seam (Telegram in production, a recorder in
//! tests). `Notifier` binds a transport to the configured chat and never fails:
//! delivery errors are logged and dropped so they cannot affect the lifecycle
//! operation that triggered them.

/// Message templates for delivery assignments and consultation requests
pub mod messages;
/// Telegram Bot API transport
pub mod telegram;

use crate::errors::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub use telegram::TelegramSender;

/// Transport able to post a text message into a chat.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Posts `text` into `chat_id`.
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()>;
}

/// Transport used when no credentials are configured; drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSender;

#[async_trait]
impl MessageSender for DisabledSender {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        tracing::debug!(chat_id, "Notifications disabled, dropping message: {}", text);
        Ok(())
    }
}

/// Best-effort notifier bound to one destination chat.
#[derive(Clone)]
pub struct Notifier {
    sender: Arc<dyn MessageSender>,
    chat_id: String,
}

impl Notifier {
    /// Creates a notifier posting through `sender` into `chat_id`.
    pub fn new(sender: Arc<dyn MessageSender>, chat_id: impl Into<String>) -> Self {
        Self {
            sender,
            chat_id: chat_id.into(),
        }
    }

    /// Creates a notifier that drops all messages.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Arc::new(DisabledSender), "")
    }

    /// Destination chat identifier
    #[must_use]
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Sends `text`; failures are logged and swallowed.
    pub async fn notify(&self, text: &str) {
        if let Err(e) = self.sender.send_message(&self.chat_id, text).await {
            tracing::warn!(chat_id = %self.chat_id, "Failed to deliver notification: {}", e);
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}
