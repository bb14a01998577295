use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use quickthoughts_core::types::{Thought, ThoughtId, THOUGHT_PREFIX};

use crate::error::Result;
use crate::kv::KvStore;

/// Thought persistence on top of any [`KvStore`].
///
/// Holds no state of its own; every call goes to the backing store.
#[derive(Clone)]
pub struct ThoughtStore {
    kv: Arc<dyn KvStore>,
}

impl ThoughtStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Persist `text` as a new thought captured at `at`.
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub async fn capture(&self, text: &str, at: DateTime<Utc>) -> Result<Thought> {
        let thought = Thought::new(text, at);
        self.kv
            .put(thought.id.as_str(), &thought.to_stored_json()?)
            .await?;
        info!(id = %thought.id, "thought captured");
        Ok(thought)
    }

    /// Number of thoughts waiting to be synced.
    pub async fn pending_count(&self) -> Result<usize> {
        Ok(self.kv.list(THOUGHT_PREFIX).await?.len())
    }

    /// Every stored thought, oldest first. Keys that disappear between the
    /// listing and the read are skipped; an unparseable value is an error.
    pub async fn list_sorted(&self) -> Result<Vec<Thought>> {
        let keys = self.kv.list(THOUGHT_PREFIX).await?;
        let mut thoughts = Vec::with_capacity(keys.len());
        for key in keys {
            match self.kv.get(&key).await? {
                Some(value) => thoughts.push(Thought::from_stored(key, &value)?),
                None => debug!(key = %key, "thought vanished before read"),
            }
        }
        // Stable: equal timestamps keep key order.
        thoughts.sort_by_key(|t| t.timestamp);
        Ok(thoughts)
    }

    /// Delete the given thoughts one by one. Stops at the first failure and
    /// leaves the rest in place. Returns how many were deleted.
    pub async fn delete_all(&self, thoughts: &[Thought]) -> Result<usize> {
        for thought in thoughts {
            self.kv.delete(thought.id.as_str()).await?;
        }
        Ok(thoughts.len())
    }

    /// Fetch everything, delete it, and return what was removed.
    ///
    /// With `only` set, deletion is limited to those IDs among the fetched
    /// thoughts; unknown IDs are ignored.
    pub async fn drain(&self, only: Option<&[ThoughtId]>) -> Result<Vec<Thought>> {
        let mut thoughts = self.list_sorted().await?;
        if let Some(ids) = only {
            let wanted: HashSet<&ThoughtId> = ids.iter().collect();
            thoughts.retain(|t| wanted.contains(&t.id));
        }
        let cleared = self.delete_all(&thoughts).await?;
        info!(cleared, "thoughts cleared");
        Ok(thoughts)
    }
}
