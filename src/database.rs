//! SQLite storage backend for BrandMeld
//!
//! Stores every key in a single `kv` table so the whole application
//! state lives in one database file.

use crate::backend::{validate_key, Storage};
use crate::error::Result;
use chrono::{DateTime, Utc};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

/// Default database file name inside the data directory
pub const DEFAULT_DATABASE_FILE: &str = "brandmeld.db";

/// Column value as text; bytes that are not UTF-8 are replaced
fn value_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Integer(n) => n.to_string(),
        ValueRef::Real(n) => n.to_string(),
        ValueRef::Null => String::new(),
    }
}

/// Storage backed by a SQLite key/value table
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open a database file and initialize schema
    #[must_use = "Database connection must be used"]
    pub fn open(db_path: &Path) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        let storage = Self { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let storage = Self {
            conn: Connection::open_in_memory()?,
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// When `key` was last written
    pub fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        validate_key(key)?;
        let ts = self
            .conn
            .query_row(
                "SELECT updated_at FROM kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, DateTime<Utc>>(0),
            )
            .optional()?;
        Ok(ts)
    }
}

impl Storage for SqliteStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                Ok(value_text(row.get_ref(0)?))
            })
            .optional()?;
        debug!(key, found = value.is_some(), "read value");
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now()],
        )?;
        debug!(key, bytes = value.len(), "wrote value");
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        let removed = self
            .conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        debug!(key, removed, "deleted value");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HISTORY_KEY;
    use crate::history::HistoryStore;
    use tempfile::TempDir;

    #[test]
    fn test_upsert_and_read() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        assert_eq!(storage.read("k").unwrap(), None);

        storage.write("k", "first").unwrap();
        storage.write("k", "second").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("second"));
        assert!(storage.updated_at("k").unwrap().is_some());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        storage.write("k", "v").unwrap();
        storage.delete("k").unwrap();
        storage.delete("k").unwrap();
        assert_eq!(storage.read("k").unwrap(), None);
        assert_eq!(storage.updated_at("k").unwrap(), None);
    }

    #[test]
    fn test_non_text_history_is_discarded() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        storage
            .conn
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, X'FFFE5B5D', ?2)",
                params![HISTORY_KEY, Utc::now()],
            )
            .unwrap();

        let store = HistoryStore::initialize(storage).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.storage().read(HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn test_persists_across_connections() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sub").join(DEFAULT_DATABASE_FILE);

        {
            let mut storage = SqliteStorage::open(&path).unwrap();
            storage.write("brandmeld_history", "[]").unwrap();
        }

        let storage = SqliteStorage::open(&path).unwrap();
        assert_eq!(
            storage.read("brandmeld_history").unwrap().as_deref(),
            Some("[]")
        );
    }
}
