//! Tabular record store and the local key/value persistence port.
//!
//! `RecordStore` mirrors a spreadsheet-style remote table API: records are
//! addressed by table name and opaque id and carry a flat JSON field map.
//! `LocalStore` is the small keyed-blob port used by the reminder and
//! viewed-lead registries.

mod kv;
mod sqlite;

pub use kv::{LocalStore, SqliteKv};
#[cfg(test)]
pub use kv::MemoryKv;
pub use sqlite::SqliteStore;

use common::model::record::{FieldMap, Record};
use thiserror::Error;

pub const LEADS_TABLE: &str = "leads";
pub const USERS_TABLE: &str = "users";
pub const SCHOOLS_TABLE: &str = "schools";

/// Page size used when materializing whole tables.
pub const PAGE_SIZE: usize = 100;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("malformed record data: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("record {id} not found in {table}")]
    NotFound { table: String, id: String },
}

pub trait RecordStore: Send + Sync {
    /// Records of `table` in insertion order, skipping `offset`.
    fn list_page(&self, table: &str, offset: usize, limit: usize) -> Result<Vec<Record>, StoreError>;

    fn get(&self, table: &str, id: &str) -> Result<Record, StoreError>;

    fn create(&self, table: &str, fields: FieldMap) -> Result<Record, StoreError>;

    /// Merges `fields` into the record; a `null` value removes that field.
    fn update(&self, table: &str, id: &str, fields: FieldMap) -> Result<Record, StoreError>;

    /// Returns the id of the deleted record.
    fn delete(&self, table: &str, id: &str) -> Result<String, StoreError>;

    /// Every record of `table`, fetched page by page.
    fn list(&self, table: &str) -> Result<Vec<Record>, StoreError> {
        let mut records = Vec::new();
        let mut offset = 0;
        loop {
            let page = self.list_page(table, offset, PAGE_SIZE)?;
            let fetched = page.len();
            records.extend(page);
            if fetched < PAGE_SIZE {
                return Ok(records);
            }
            offset += fetched;
        }
    }
}

/// Lazy page-by-page walk over a table.
///
/// Finite: it stops after the first short (or failed) page. Restart it by
/// creating a new one.
pub struct RecordPages<'a> {
    store: &'a dyn RecordStore,
    table: String,
    page_size: usize,
    offset: usize,
    done: bool,
}

impl<'a> RecordPages<'a> {
    pub fn new(store: &'a dyn RecordStore, table: &str, page_size: usize) -> Self {
        RecordPages {
            store,
            table: table.to_string(),
            page_size: page_size.max(1),
            offset: 0,
            done: false,
        }
    }
}

impl Iterator for RecordPages<'_> {
    type Item = Result<Vec<Record>, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.store.list_page(&self.table, self.offset, self.page_size) {
            Ok(page) if page.is_empty() => {
                self.done = true;
                None
            }
            Ok(page) => {
                self.offset += page.len();
                self.done = page.len() < self.page_size;
                Some(Ok(page))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
