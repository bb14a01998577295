pub mod allow;
pub mod command;
pub mod error;
pub mod handler;
pub mod messenger;
pub mod update;

pub use error::TelegramError;
pub use handler::{handle_update, Outcome};
pub use messenger::{Messenger, TelegramMessenger};
pub use update::Update;
