//! Bot commands and reply texts.

pub const UNAUTHORIZED_REPLY: &str = "⛔ Unauthorized. This bot is private.";
pub const WELCOME_REPLY: &str = "✅ Connected! Send me any thought and it will sync to your Obsidian vault.\n\nCommands:\n/status - Check pending thoughts";
pub const CAPTURED_REPLY: &str = "💭 Captured!";

/// Commands the bot answers instead of capturing the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `/start` or `/help`
    Start,
    /// `/status`
    Status,
}

impl Command {
    /// Recognise a command. The whole message must be the command, optionally
    /// addressed to a bot (`/status@my_bot`); anything else is a thought.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let name = trimmed.strip_prefix('/')?;
        let name = match name.split_once('@') {
            Some((cmd, bot)) if !bot.is_empty() && !bot.contains(char::is_whitespace) => cmd,
            Some(_) => return None,
            None => name,
        };
        match name {
            "start" | "help" => Some(Self::Start),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

pub fn status_reply(pending: usize) -> String {
    format!("📊 You have {pending} thought(s) waiting to sync.")
}
