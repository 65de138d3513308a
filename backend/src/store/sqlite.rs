use super::{RecordStore, StoreError};
use chrono::Utc;
use common::model::record::{FieldMap, Record};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS records (
    seq          INTEGER PRIMARY KEY AUTOINCREMENT,
    table_name   TEXT NOT NULL,
    id           TEXT NOT NULL,
    created_time TEXT NOT NULL,
    fields       TEXT NOT NULL,
    UNIQUE (table_name, id)
);
CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

/// `RecordStore` over a single SQLite file.
///
/// A connection is opened per operation, so the store is trivially shareable
/// between actix workers and blocking import jobs.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Opens (and if needed creates) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = SqliteStore {
            path: path.as_ref().to_path_buf(),
        };
        store.connect()?.execute_batch(SCHEMA)?;
        Ok(store)
    }

    pub(super) fn connect(&self) -> Result<Connection, StoreError> {
        open_connection(&self.path)
    }

    fn read_row(
        conn: &Connection,
        table: &str,
        id: &str,
    ) -> Result<Option<(String, String)>, StoreError> {
        let row = conn
            .query_row(
                "SELECT created_time, fields FROM records WHERE table_name = ?1 AND id = ?2",
                params![table, id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        Ok(row)
    }
}

pub(super) fn open_connection(path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(Duration::from_secs(5))?;
    Ok(conn)
}

fn to_record(id: String, created_time: String, fields: &str) -> Result<Record, StoreError> {
    let fields: FieldMap = serde_json::from_str(fields)?;
    Ok(Record {
        id,
        created_time,
        fields,
    })
}

fn not_found(table: &str, id: &str) -> StoreError {
    StoreError::NotFound {
        table: table.to_string(),
        id: id.to_string(),
    }
}

impl RecordStore for SqliteStore {
    fn list_page(&self, table: &str, offset: usize, limit: usize) -> Result<Vec<Record>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, created_time, fields FROM records
             WHERE table_name = ?1 ORDER BY seq LIMIT ?2 OFFSET ?3",
        )?;
        let rows = stmt.query_map(params![table, limit as i64, offset as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, created_time, fields) = row?;
            records.push(to_record(id, created_time, &fields)?);
        }
        Ok(records)
    }

    fn get(&self, table: &str, id: &str) -> Result<Record, StoreError> {
        let conn = self.connect()?;
        let (created_time, fields) =
            Self::read_row(&conn, table, id)?.ok_or_else(|| not_found(table, id))?;
        to_record(id.to_string(), created_time, &fields)
    }

    fn create(&self, table: &str, fields: FieldMap) -> Result<Record, StoreError> {
        let fields: FieldMap = fields.into_iter().filter(|(_, v)| !v.is_null()).collect();
        let record = Record {
            id: format!("rec{}", Uuid::new_v4().simple()),
            created_time: Utc::now().to_rfc3339(),
            fields,
        };
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO records (table_name, id, created_time, fields) VALUES (?1, ?2, ?3, ?4)",
            params![
                table,
                &record.id,
                &record.created_time,
                serde_json::to_string(&record.fields)?
            ],
        )?;
        Ok(record)
    }

    fn update(&self, table: &str, id: &str, fields: FieldMap) -> Result<Record, StoreError> {
        let conn = self.connect()?;
        let (created_time, stored) =
            Self::read_row(&conn, table, id)?.ok_or_else(|| not_found(table, id))?;
        let mut record = to_record(id.to_string(), created_time, &stored)?;

        for (key, value) in fields {
            if value == Value::Null {
                record.fields.remove(&key);
            } else {
                record.fields.insert(key, value);
            }
        }

        conn.execute(
            "UPDATE records SET fields = ?1 WHERE table_name = ?2 AND id = ?3",
            params![serde_json::to_string(&record.fields)?, table, id],
        )?;
        Ok(record)
    }

    fn delete(&self, table: &str, id: &str) -> Result<String, StoreError> {
        let conn = self.connect()?;
        let removed = conn.execute(
            "DELETE FROM records WHERE table_name = ?1 AND id = ?2",
            params![table, id],
        )?;
        if removed == 0 {
            return Err(not_found(table, id));
        }
        Ok(id.to_string())
    }
}
