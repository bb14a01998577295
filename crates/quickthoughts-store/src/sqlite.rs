use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::kv::KvStore;

/// Key-value store backed by a single SQLite table.
///
/// Thread-safe: wraps the connection in a Mutex. Every call is a single
/// short statement, so the lock is never held across an await point.
pub struct SqliteKv {
    db: Mutex<Connection>,
}

impl SqliteKv {
    /// Open (or create) the database file and run migrations.
    pub fn open(path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        info!(path = %path, "opening SQLite store");
        Self::new(Connection::open(path)?)
    }

    /// Wrap an already-open connection (e.g. `Connection::open_in_memory()`).
    pub fn new(conn: Connection) -> Result<Self> {
        crate::db::init_db(&conn)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.db.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

#[async_trait]
impl KvStore for SqliteKv {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let db = self.conn()?;
        let value = db
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                rusqlite::params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let db = self.conn()?;
        let now = chrono::Utc::now().to_rfc3339();
        db.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                            updated_at = excluded.updated_at",
            rusqlite::params![key, value, now],
        )?;
        debug!(key, "kv put");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let db = self.conn()?;
        db.execute("DELETE FROM kv WHERE key = ?1", rusqlite::params![key])?;
        debug!(key, "kv delete");
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let db = self.conn()?;
        // substr() instead of LIKE: prefixes may contain `_`, a LIKE wildcard.
        let mut stmt = db.prepare(
            "SELECT key FROM kv
             WHERE substr(key, 1, length(?1)) = ?1
             ORDER BY key",
        )?;
        let keys = stmt
            .query_map(rusqlite::params![prefix], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(keys)
    }
}
