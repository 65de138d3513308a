//! Spreadsheet column names shared by CSV import and export.

use common::model::lead::Lead;
use common::pipeline::site::classify_site;
use serde_json::Value;

/// `(header, lead field)` in export order.
pub const COLUMNS: [(&str, &str); 15] = [
    ("Name", "name"),
    ("Email", "email"),
    ("Phone Number", "phoneNumber"),
    ("Source", "source"),
    ("URL", "url"),
    ("Date", "date"),
    ("Disposition", "disposition"),
    ("Specific Disposition", "specificDisposition"),
    ("Assigned To", "assignedTo"),
    ("Budget", "budget"),
    ("Board", "board"),
    ("School Type", "schoolType"),
    ("Location", "location"),
    ("School", "school"),
    ("Remark", "remark"),
];

/// Lead field for a CSV header; unknown headers are kept verbatim.
pub fn field_for_header(header: &str) -> String {
    let header = header.trim();
    COLUMNS
        .iter()
        .find(|(title, key)| title.eq_ignore_ascii_case(header) || key.eq_ignore_ascii_case(header))
        .map(|(_, key)| key.to_string())
        .unwrap_or_else(|| header.to_string())
}

pub fn export_headers() -> Vec<&'static str> {
    let mut headers: Vec<&str> = COLUMNS.iter().map(|(title, _)| *title).collect();
    headers.insert(5, "Site");
    headers
}

/// One export row, aligned with `export_headers`.
pub fn export_row(lead: &Lead) -> Vec<String> {
    let fields = match serde_json::to_value(lead) {
        Ok(Value::Object(map)) => map,
        _ => Default::default(),
    };
    let mut row: Vec<String> = COLUMNS
        .iter()
        .map(|(_, key)| match fields.get(*key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        })
        .collect();
    row.insert(5, classify_site(lead).unwrap_or_default());
    row
}
