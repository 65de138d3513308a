use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat field map as stored per record.
pub type FieldMap = Map<String, Value>;

/// A raw row from the tabular record store.
///
/// The store knows nothing about leads or schools; it hands back an opaque
/// identifier, the creation timestamp and whatever fields were written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub created_time: String,
    pub fields: FieldMap,
}
