//! School catalog records and match results.
//!
//! The catalog arrives as flat field maps. Columns are interpreted by
//! convention:
//! - `Name` / `School Name`, `Ranking`, `Location`, `Description`
//! - `<class> Fee` (e.g. `Class 5 Fee`): fee figure for that class
//! - known board columns (`CBSE`, `ICSE`, ...) holding `Yes` / `No`
//! - any other `Yes` / `No` column is an amenity flag
//! - everything else is kept as descriptive text

use crate::model::record::FieldMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const KNOWN_BOARDS: [&str; 6] = ["CBSE", "ICSE", "IB", "IGCSE", "Cambridge", "State Board"];

const FEE_SUFFIX: &str = " Fee";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub name: String,
    pub ranking: Option<u32>,
    pub location: Option<String>,
    pub description: Option<String>,
    /// Fee per class label, e.g. `"Class 5" -> 120000`.
    pub fees: BTreeMap<String, u64>,
    pub boards: BTreeMap<String, bool>,
    pub amenities: BTreeMap<String, bool>,
    pub details: BTreeMap<String, String>,
}

impl School {
    pub fn from_fields(fields: &FieldMap) -> Self {
        let mut school = School::default();

        for (key, value) in fields {
            let label = key.trim();
            match label.to_ascii_lowercase().as_str() {
                "name" | "school name" => school.name = text_of(value).unwrap_or_default(),
                "ranking" | "rank" => {
                    school.ranking = number_of(value).and_then(|n| u32::try_from(n).ok())
                }
                "location" => school.location = text_of(value),
                "description" => school.description = text_of(value),
                _ => {
                    if let Some(class) = label.strip_suffix(FEE_SUFFIX) {
                        if let Some(fee) = number_of(value) {
                            school.fees.insert(class.trim().to_string(), fee);
                        }
                    } else if let Some(board) =
                        KNOWN_BOARDS.iter().find(|b| b.eq_ignore_ascii_case(label))
                    {
                        school.boards.insert(board.to_string(), flag_of(value).unwrap_or(false));
                    } else if let Some(flag) = flag_of(value) {
                        school.amenities.insert(label.to_string(), flag);
                    } else if let Some(text) = text_of(value) {
                        school.details.insert(label.to_string(), text);
                    }
                }
            }
        }

        school
    }

    pub fn offers_board(&self, board: &str) -> bool {
        self.boards
            .iter()
            .any(|(name, offered)| *offered && name.eq_ignore_ascii_case(board.trim()))
    }

    pub fn fee_for(&self, class_level: &str) -> Option<u64> {
        let wanted = class_level.trim();
        self.fees
            .iter()
            .find(|(class, _)| class.eq_ignore_ascii_case(wanted))
            .map(|(_, fee)| *fee)
    }
}

/// Validated input of the school matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    pub budget: u64,
    pub boards: Vec<String>,
    pub class_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolMatch {
    #[serde(flatten)]
    pub school: School,
    pub school_budget: u64,
    pub match_percentage: u8,
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads figures like `120000`, `"1,20,000"` or `"₹ 95,000.00"`.
pub fn parse_amount(raw: &str) -> Option<u64> {
    let whole = raw.split('.').next().unwrap_or_default();
    let digits: String = whole.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

fn number_of(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        Value::String(s) => parse_amount(s),
        _ => None,
    }
}

fn flag_of(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" => Some(true),
            "no" | "n" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
