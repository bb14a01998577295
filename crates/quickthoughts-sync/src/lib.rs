pub mod client;
pub mod error;
pub mod journal;
pub mod sync;

pub use client::RelayClient;
pub use error::SyncError;
pub use journal::Journal;
pub use sync::{run, SyncOptions, SyncOutcome};
