use std::sync::Arc;

use tracing::info;

use quickthoughts_core::types::{SyncCredential, SYNC_SECRET_KEY};

use crate::error::Result;
use crate::kv::KvStore;

/// Loads and provisions the single store-wide [`SyncCredential`].
///
/// A credential pinned in configuration wins over the stored one and is
/// never written back.
#[derive(Clone)]
pub struct CredentialStore {
    kv: Arc<dyn KvStore>,
    pinned: Option<SyncCredential>,
}

impl CredentialStore {
    pub fn new(kv: Arc<dyn KvStore>, pinned: Option<String>) -> Self {
        Self {
            kv,
            pinned: pinned
                .filter(|s| !s.is_empty())
                .map(SyncCredential::new),
        }
    }

    /// The current credential, or `None` if setup has not run yet.
    pub async fn load(&self) -> Result<Option<SyncCredential>> {
        if let Some(ref pinned) = self.pinned {
            return Ok(Some(pinned.clone()));
        }
        Ok(self
            .kv
            .get(SYNC_SECRET_KEY)
            .await?
            .filter(|s| !s.is_empty())
            .map(SyncCredential::new))
    }

    /// Return the existing credential, creating and storing one if absent.
    /// Never replaces a credential that already exists.
    pub async fn load_or_provision(&self) -> Result<SyncCredential> {
        if let Some(existing) = self.load().await? {
            return Ok(existing);
        }
        let fresh = SyncCredential::generate();
        self.kv.put(SYNC_SECRET_KEY, fresh.secret()).await?;
        info!("sync credential provisioned");
        Ok(fresh)
    }
}
