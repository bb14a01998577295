use rusqlite::{Connection, Result};

/// Initialise the key-value table. Safe to call on every startup (idempotent).
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    create_kv_table(conn)
}

/// One row per key. `WITHOUT ROWID` keeps the table clustered on `key`, so
/// prefix listing is an ordered range scan.
fn create_kv_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv (
            key         TEXT PRIMARY KEY NOT NULL,
            value       TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        ) WITHOUT ROWID;",
    )
}
