pub mod cloudflare;
pub mod credential;
pub mod db;
pub mod error;
pub mod kv;
pub mod memory;
pub mod sqlite;
pub mod thoughts;

use std::sync::Arc;

use quickthoughts_core::config::{StoreBackend, StoreConfig};

pub use credential::CredentialStore;
pub use error::StoreError;
pub use kv::KvStore;
pub use memory::MemoryKv;
pub use sqlite::SqliteKv;
pub use thoughts::ThoughtStore;

/// Open the backend selected in `[store]`.
pub fn open(config: &StoreConfig) -> Result<Arc<dyn KvStore>, StoreError> {
    let store: Arc<dyn KvStore> = match config.backend {
        StoreBackend::Sqlite => Arc::new(SqliteKv::open(&config.path)?),
        StoreBackend::Memory => Arc::new(MemoryKv::new()),
        StoreBackend::Cloudflare => {
            let cf = config.cloudflare.as_ref().ok_or_else(|| {
                StoreError::Config("missing [store.cloudflare] section".to_string())
            })?;
            Arc::new(cloudflare::CloudflareKv::new(cf))
        }
    };
    Ok(store)
}
