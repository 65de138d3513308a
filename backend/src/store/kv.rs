use super::sqlite::open_connection;
use super::StoreError;
use rusqlite::{params, OptionalExtension};
use std::path::{Path, PathBuf};

/// Keyed string blobs persisted across restarts.
///
/// Registries read and write whole JSON documents under a single key; there
/// is no schema versioning.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// `LocalStore` kept in the `kv` table of the service database.
#[derive(Debug, Clone)]
pub struct SqliteKv {
    path: PathBuf,
}

impl SqliteKv {
    /// Expects the schema created by `SqliteStore::open` on the same file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        SqliteKv {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LocalStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = open_connection(&self.path)?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = open_connection(&self.path)?;
        conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let conn = open_connection(&self.path)?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// In-memory `LocalStore` for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryKv {
    values: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl LocalStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}
