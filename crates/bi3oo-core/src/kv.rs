//! Blob-by-key persistence backends
//!
//! The store only needs `get`/`set` of a whole serialized slot, so any backend
//! that can hold a string under a key will do.

use crate::error::{MarketError, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> MarketError {
    MarketError::Storage("storage lock poisoned".to_string())
}

/// Process-local backend, lost on exit.
#[derive(Default)]
pub struct MemoryKv {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let slots = self.slots.lock().map_err(poisoned)?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.slots.lock().map_err(poisoned)?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a directory.
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

impl KvStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // Write to a sibling file first so a crash mid-write leaves the old slot intact
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Single `kv` table in an SQLite database.
pub struct SqliteKv {
    conn: Mutex<Connection>,
}

impl SqliteKv {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl KvStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().map_err(poisoned)?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().map_err(poisoned)?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(kv: &dyn KvStore) {
        assert_eq!(kv.get("lbc_sql_users").unwrap(), None);
        kv.set("lbc_sql_users", "[]").unwrap();
        kv.set("lbc_sql_users", "[1]").unwrap();
        assert_eq!(kv.get("lbc_sql_users").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_memory_kv() {
        roundtrip(&MemoryKv::new());
    }

    #[test]
    fn test_file_kv() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::open(dir.path().join("data")).unwrap();
        roundtrip(&kv);
        assert!(dir.path().join("data").join("lbc_sql_users.json").exists());
    }

    #[test]
    fn test_file_kv_sanitizes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::open(dir.path()).unwrap();
        kv.set("../escape", "x").unwrap();
        assert!(dir.path().join("___escape.json").exists());
    }

    #[test]
    fn test_sqlite_kv_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bi3oo.db");
        {
            let kv = SqliteKv::open(&path).unwrap();
            roundtrip(&kv);
        }
        let kv = SqliteKv::open(&path).unwrap();
        assert_eq!(kv.get("lbc_sql_users").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_sqlite_kv_in_memory() {
        roundtrip(&SqliteKv::open_in_memory().unwrap());
    }
}
