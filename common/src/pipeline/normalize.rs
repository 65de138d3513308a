use crate::model::lead::{Disposition, Lead, DEFAULT_SPECIFIC_DISPOSITION};
use crate::model::record::Record;
use serde_json::Value;
use std::collections::BTreeMap;

/// Turns a raw store record into a `Lead`.
///
/// Blank strings count as absent, numbers and multi-select arrays are
/// rendered as text, and `disposition` / `specificDisposition` receive their
/// defaults. Unknown disposition labels fall back to `Undefined`.
pub fn normalize_record(record: &Record) -> Lead {
    let mut fields: BTreeMap<String, Value> = record
        .fields
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let disposition = match take_text(&mut fields, "disposition") {
        Some(label) => label.parse().unwrap_or_else(|e| {
            log::debug!("record {}: {}, using Undefined", record.id, e);
            Disposition::Undefined
        }),
        None => Disposition::Undefined,
    };

    Lead {
        id: record.id.clone(),
        name: take_text(&mut fields, "name"),
        email: take_text(&mut fields, "email"),
        phone_number: take_text(&mut fields, "phoneNumber"),
        source: take_text(&mut fields, "source"),
        url: take_text(&mut fields, "url"),
        date: take_text(&mut fields, "date"),
        disposition,
        specific_disposition: take_text(&mut fields, "specificDisposition")
            .unwrap_or_else(|| DEFAULT_SPECIFIC_DISPOSITION.to_string()),
        assigned_to: take_text(&mut fields, "assignedTo"),
        remark: take_text(&mut fields, "remark"),
        budget: take_text(&mut fields, "budget"),
        board: take_text(&mut fields, "board"),
        school_type: take_text(&mut fields, "schoolType"),
        location: take_text(&mut fields, "location"),
        school: take_text(&mut fields, "school"),
        extra: fields,
    }
}

pub fn normalize_records(records: &[Record]) -> Vec<Lead> {
    records.iter().map(normalize_record).collect()
}

fn take_text(fields: &mut BTreeMap<String, Value>, key: &str) -> Option<String> {
    fields.remove(key).and_then(|value| value_to_text(&value))
}

fn value_to_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(value_to_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, fields: Value) -> Record {
        Record {
            id: id.to_string(),
            created_time: "2024-01-01T00:00:00Z".to_string(),
            fields: fields.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn fills_default_dispositions() {
        let lead = normalize_record(&record("rec1", json!({ "name": "Asha" })));
        assert_eq!(lead.disposition, Disposition::Undefined);
        assert_eq!(lead.specific_disposition, DEFAULT_SPECIFIC_DISPOSITION);
        assert_eq!(lead.name.as_deref(), Some("Asha"));
    }

    #[test]
    fn coerces_loose_values_and_keeps_unknown_columns() {
        let lead = normalize_record(&record(
            "rec2",
            json!({
                "email": "  ",
                "budget": 150000,
                "board": ["CBSE", "ICSE"],
                "disposition": "hot",
                "siblings": 2
            }),
        ));
        assert_eq!(lead.email, None);
        assert_eq!(lead.budget.as_deref(), Some("150000"));
        assert_eq!(lead.board.as_deref(), Some("CBSE, ICSE"));
        assert_eq!(lead.disposition, Disposition::Hot);
        assert_eq!(lead.extra.get("siblings"), Some(&json!(2)));
        assert!(!lead.extra.contains_key("budget"));
    }

    #[test]
    fn unknown_disposition_degrades_to_undefined() {
        let lead = normalize_record(&record("rec3", json!({ "disposition": "Maybe" })));
        assert_eq!(lead.disposition, Disposition::Undefined);
    }
}
