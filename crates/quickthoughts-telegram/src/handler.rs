//! Webhook update handler.

use chrono::Utc;
use tracing::{info, warn};

use quickthoughts_core::types::Thought;
use quickthoughts_store::{StoreError, ThoughtStore};

use crate::allow;
use crate::command::{self, Command};
use crate::messenger::Messenger;
use crate::update::Update;

/// What the handler did with an update. The HTTP answer is the same for
/// every variant; this exists for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No text message in the update.
    Ignored,
    /// Sender not allowed (or unknown); nothing stored.
    Rejected,
    /// `/start` or `/help` answered.
    Greeted,
    /// `/status` answered with the pending count.
    Status(usize),
    /// Text stored as a new thought.
    Captured(Thought),
}

/// Handle one inbound update.
///
/// Performs:
/// 1. Text-message filter
/// 2. Sender check (deny-by-default, single owner)
/// 3. Command interception
/// 4. Capture
///
/// Replies are best-effort: a failed send is logged and otherwise ignored.
/// Only store failures propagate.
pub async fn handle_update(
    update: &Update,
    allowed_user_id: i64,
    thoughts: &ThoughtStore,
    messenger: &dyn Messenger,
) -> Result<Outcome, StoreError> {
    // 1. Only text messages matter.
    let Some(msg) = update.text_message() else {
        return Ok(Outcome::Ignored);
    };

    // 2. Sender check.
    if !allow::is_allowed(allowed_user_id, msg.sender_id) {
        warn!(
            sender_id = ?msg.sender_id,
            chat_id = msg.chat_id,
            "rejected message from unauthorized sender"
        );
        // Nobody to tell when there is no sender.
        if msg.sender_id.is_some() {
            reply(messenger, msg.chat_id, command::UNAUTHORIZED_REPLY).await;
        }
        return Ok(Outcome::Rejected);
    }

    // 3. Commands.
    match Command::parse(msg.text) {
        Some(Command::Start) => {
            reply(messenger, msg.chat_id, command::WELCOME_REPLY).await;
            return Ok(Outcome::Greeted);
        }
        Some(Command::Status) => {
            let pending = thoughts.pending_count().await?;
            reply(messenger, msg.chat_id, &command::status_reply(pending)).await;
            return Ok(Outcome::Status(pending));
        }
        None => {}
    }

    // 4. Capture.
    let thought = thoughts.capture(msg.text, Utc::now()).await?;
    info!(id = %thought.id, chat_id = msg.chat_id, "captured thought from Telegram");
    reply(messenger, msg.chat_id, command::CAPTURED_REPLY).await;
    Ok(Outcome::Captured(thought))
}

async fn reply(messenger: &dyn Messenger, chat_id: i64, text: &str) {
    if let Err(e) = messenger.send_message(chat_id, text).await {
        warn!(error = %e, chat_id, "Telegram: reply failed");
    }
}
