//! Inbound webhook payload.
//!
//! Only the fields the relay reads are modelled, and all of them are
//! optional: Telegram delivers many update kinds (edits, callbacks, channel
//! posts) that must be acknowledged without failing to parse.

use serde::Deserialize;
use serde_json::error::Category;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Update {
    pub update_id: Option<i64>,
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub from: Option<Sender>,
    pub chat: Option<Chat>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sender {
    pub id: i64,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// A text message with a chat to reply to; the only update the relay acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage<'a> {
    pub sender_id: Option<i64>,
    pub chat_id: i64,
    pub text: &'a str,
}

/// Why a body could not become an [`Update`].
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Not JSON at all.
    #[error("invalid JSON: {0}")]
    Syntax(serde_json::Error),
    /// JSON, but not an update shape the relay understands.
    #[error("unrecognised update shape: {0}")]
    Shape(serde_json::Error),
}

impl Update {
    /// Parse a raw webhook body, separating broken JSON from foreign shapes.
    pub fn parse(body: &[u8]) -> Result<Self, ParseError> {
        serde_json::from_slice(body).map_err(|e| match e.classify() {
            Category::Data => ParseError::Shape(e),
            Category::Syntax | Category::Eof | Category::Io => ParseError::Syntax(e),
        })
    }

    /// The text message this update carries, if any.
    pub fn text_message(&self) -> Option<TextMessage<'_>> {
        let msg = self.message.as_ref()?;
        let text = msg.text.as_deref()?;
        let chat = msg.chat.as_ref()?;
        Some(TextMessage {
            sender_id: msg.from.as_ref().map(|u| u.id),
            chat_id: chat.id,
            text,
        })
    }
}
