use async_trait::async_trait;

use crate::error::Result;

/// String-to-string store with per-key atomicity and no transactions.
///
/// Implementations must be `Send + Sync`; the gateway shares one instance
/// across every request task.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Stable lowercase backend name for logs (e.g. `"sqlite"`).
    fn name(&self) -> &str;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite.
    async fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// All keys starting with `prefix`, in ascending key order.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
}
