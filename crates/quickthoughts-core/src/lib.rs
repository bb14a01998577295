pub mod config;
pub mod error;
pub mod types;

pub use config::QuickThoughtsConfig;
pub use error::{RelayError, Result};
pub use types::{SyncCredential, Thought, ThoughtId};
