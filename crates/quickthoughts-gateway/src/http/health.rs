/// Plain-text liveness string served at `/` for any method.
pub const LIVENESS_TEXT: &str = "🧠 Obsidian Quick Thoughts Bot is running";

/// /: liveness check.
pub async fn root_handler() -> &'static str {
    LIVENESS_TEXT
}
