//! Fetch, merge into the note, write, clear.

use std::path::PathBuf;

use tracing::{debug, info};

use quickthoughts_core::types::ThoughtId;

use crate::client::RelayClient;
use crate::error::Result;
use crate::journal::Journal;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Full path of the note, `<vault>/<file>`.
    pub note_path: PathBuf,
    /// Print the merged note instead of writing it; clear nothing.
    pub dry_run: bool,
    /// Write the note but leave the thoughts on the relay.
    pub keep: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    NothingPending,
    DryRun {
        fetched: usize,
        rendered: String,
    },
    Written {
        fetched: usize,
        path: PathBuf,
        /// `None` with `--keep`.
        cleared: Option<usize>,
    },
}

pub async fn run(client: &RelayClient, opts: &SyncOptions) -> Result<SyncOutcome> {
    let thoughts = client.fetch_thoughts().await?;
    if thoughts.is_empty() {
        return Ok(SyncOutcome::NothingPending);
    }
    let fetched = thoughts.len();
    debug!(fetched, "thoughts fetched");

    let existing = match tokio::fs::read_to_string(&opts.note_path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let mut journal = Journal::parse(&existing);
    for thought in &thoughts {
        journal.add(thought);
    }
    let rendered = journal.render();

    if opts.dry_run {
        return Ok(SyncOutcome::DryRun { fetched, rendered });
    }

    if let Some(dir) = opts.note_path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(&opts.note_path, rendered).await?;
    info!(path = %opts.note_path.display(), fetched, "note written");

    let cleared = if opts.keep {
        None
    } else {
        let ids: Vec<ThoughtId> = thoughts.into_iter().map(|t| t.id).collect();
        Some(client.clear_thoughts(&ids).await?)
    };

    Ok(SyncOutcome::Written {
        fetched,
        path: opts.note_path.clone(),
        cleared,
    })
}
