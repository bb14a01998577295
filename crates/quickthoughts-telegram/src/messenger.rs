//! Outbound calls to the Telegram Bot API.
//!
//! `sendMessage` goes through teloxide. `setWebhook` is issued directly so
//! the operator gets Telegram's raw JSON answer back from the setup endpoint.

use async_trait::async_trait;
use serde_json::Value;
use teloxide::prelude::*;
use tracing::debug;

use quickthoughts_core::config::TelegramConfig;

use crate::error::TelegramError;

/// The two Bot API calls the relay makes.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a plain-text message to `chat_id`.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError>;

    /// Register `url` as the bot's webhook and return Telegram's JSON reply.
    async fn set_webhook(&self, url: &str) -> Result<Value, TelegramError>;
}

/// Production [`Messenger`] talking to `api.telegram.org` (or `api_url`).
pub struct TelegramMessenger {
    bot: Bot,
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl TelegramMessenger {
    pub fn new(config: &TelegramConfig) -> Result<Self, TelegramError> {
        if config.bot_token.trim().is_empty() {
            return Err(TelegramError::NoToken);
        }
        let api_url = config.api_url.trim_end_matches('/').to_string();
        let parsed = reqwest::Url::parse(&api_url)
            .map_err(|e| TelegramError::InvalidUrl(format!("{api_url}: {e}")))?;
        let bot = Bot::new(&config.bot_token).set_api_url(parsed);
        Ok(Self {
            bot,
            http: reqwest::Client::new(),
            api_url,
            token: config.bot_token.clone(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        self.bot.send_message(ChatId(chat_id), text).await?;
        debug!(chat_id, "telegram: message sent");
        Ok(())
    }

    async fn set_webhook(&self, url: &str) -> Result<Value, TelegramError> {
        let resp = self
            .http
            .get(self.method_url("setWebhook"))
            .query(&[("url", url)])
            .send()
            .await?;
        // Telegram answers errors with a JSON body too ({"ok":false,...});
        // hand it back unchanged either way.
        let body: Value = resp.json().await?;
        debug!(ok = ?body.get("ok"), "telegram: setWebhook answered");
        Ok(body)
    }
}
