use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Key prefix shared by every stored thought.
pub const THOUGHT_PREFIX: &str = "thought_";
/// Key holding the provisioned sync credential (plain string value).
pub const SYNC_SECRET_KEY: &str = "SYNC_SECRET";
const SYNC_SECRET_PREFIX: &str = "obsidian-sync-";

/// Store key of a thought: `thought_<unix-ms>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThoughtId(pub String);

impl ThoughtId {
    /// Time-derived ID. Unique as long as two captures never share a millisecond.
    pub fn at(at: DateTime<Utc>) -> Self {
        Self(format!("{THOUGHT_PREFIX}{}", at.timestamp_millis()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThoughtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ThoughtId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ThoughtId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A captured message awaiting sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thought {
    pub id: ThoughtId,
    pub text: String,
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

/// Value layout under a `thought_*` key. The ID lives in the key only.
#[derive(Debug, Serialize, Deserialize)]
struct StoredThought {
    text: String,
    #[serde(with = "iso_millis")]
    timestamp: DateTime<Utc>,
}

impl Thought {
    pub fn new(text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: ThoughtId::at(at),
            text: text.into(),
            timestamp: at,
        }
    }

    /// Serialize to the `{text, timestamp}` value stored under `self.id`.
    pub fn to_stored_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(&StoredThought {
            text: self.text.clone(),
            timestamp: self.timestamp,
        })?)
    }

    /// Rebuild a thought from its key and stored value.
    pub fn from_stored(id: impl Into<ThoughtId>, value: &str) -> crate::error::Result<Self> {
        let stored: StoredThought = serde_json::from_str(value)?;
        Ok(Self {
            id: id.into(),
            text: stored.text,
            timestamp: stored.timestamp,
        })
    }
}

/// Shared bearer credential used by the pull client.
///
/// One per store, created on the first setup call and never rotated.
#[derive(Clone, PartialEq, Eq)]
pub struct SyncCredential {
    secret: String,
}

impl SyncCredential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Fresh `obsidian-sync-<uuid>` credential.
    pub fn generate() -> Self {
        Self::new(format!("{SYNC_SECRET_PREFIX}{}", Uuid::new_v4()))
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Compare a presented token without short-circuiting on the first
    /// differing byte.
    pub fn verify(&self, presented: &str) -> bool {
        let a = self.secret.as_bytes();
        let b = presented.as_bytes();
        if a.len() != b.len() {
            return false;
        }
        a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

// Never print the secret itself.
impl fmt::Debug for SyncCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncCredential")
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// RFC 3339 UTC with millisecond precision and a `Z` suffix.
mod iso_millis {
    use super::*;

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
