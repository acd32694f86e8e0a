//! Telegram credentials from environment variables.
//!
//! The bot token and the destination chat are secrets and never live in
//! config.toml. Both must be present for notifications to be enabled.

/// Credentials needed to post into the staff chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramCredentials {
    /// Bot API token
    pub bot_token: String,
    /// Destination chat identifier
    pub chat_id: String,
}

/// Reads `TELEGRAM_BOT_TOKEN` and `TELEGRAM_GROUP_CHAT_ID` from the environment.
///
/// # Returns
///
/// `Some(credentials)` when both variables are set and non-empty, `None` otherwise.
#[must_use]
pub fn telegram_credentials() -> Option<TelegramCredentials> {
    credentials_from(
        std::env::var("TELEGRAM_BOT_TOKEN").ok(),
        std::env::var("TELEGRAM_GROUP_CHAT_ID").ok(),
    )
}

fn credentials_from(
    bot_token: Option<String>,
    chat_id: Option<String>,
) -> Option<TelegramCredentials> {
    let bot_token = bot_token.filter(|t| !t.trim().is_empty())?;
    let chat_id = chat_id.filter(|c| !c.trim().is_empty())?;
    Some(TelegramCredentials {
        bot_token: bot_token.trim().to_string(),
        chat_id: chat_id.trim().to_string(),
    })
}
