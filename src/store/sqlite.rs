//! SQLite-backed key-value store.
//!
//! One row per key, value is the JSON encoding of the record.
//!
//! ```sql
//! CREATE TABLE kv_records (
//!     key TEXT PRIMARY KEY,
//!     value TEXT NOT NULL,
//!     updated_at INTEGER NOT NULL
//! ) WITHOUT ROWID;
//! ```

use super::kv::KvStore;
use crate::models::StoreState;
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS kv_records (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
) WITHOUT ROWID;
"#;

#[derive(Clone)]
pub struct SqliteKv {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKv {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("open state db at {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        conn.pragma_update(None, "synchronous", "NORMAL").ok();
        Self::with_connection(conn)
    }

    /// In-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory state db")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)
            .context("create kv_records schema")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

#[async_trait::async_trait]
impl KvStore for SqliteKv {
    async fn get(&self, key: &str) -> Result<Option<StoreState>> {
        let conn = self.conn.lock().await;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM kv_records WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .context("read kv record")?;

        match raw {
            Some(json) => {
                let state = serde_json::from_str(&json)
                    .with_context(|| format!("decode kv record '{}'", key))?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, state: &StoreState) -> Result<()> {
        let json = serde_json::to_string(state).context("encode kv record")?;
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO kv_records (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, json, Utc::now().timestamp()],
        )
        .context("write kv record")?;
        debug!(key, bytes = json.len(), "kv record written");
        Ok(())
    }
}
