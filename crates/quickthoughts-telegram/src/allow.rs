//! Sender authorization for inbound updates.
//!
//! Deny-by-default: exactly one numeric Telegram user ID may capture
//! thoughts, and an unset ID (`0`) allows no one.

/// Returns `true` when `sender_id` is the configured owner of the bot.
///
/// A missing sender (channel posts, anonymous admins) is never allowed.
pub fn is_allowed(allowed_user_id: i64, sender_id: Option<i64>) -> bool {
    if allowed_user_id == 0 {
        return false;
    }
    sender_id == Some(allowed_user_id)
}
