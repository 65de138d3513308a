use crate::model::filter::{
    AssigneeFilter, DateRange, DispositionFilter, LeadFilter, SiteFilter,
};
use crate::model::lead::Disposition;
use crate::model::record::FieldMap;
use crate::pipeline::dates::parse_day;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Query string of the listing, export and analytics endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLeadsQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub site: Option<String>,
    pub assigned_user: Option<String>,
    pub disposition: Option<String>,
}

impl ListLeadsQuery {
    pub fn into_filter(self) -> Result<LeadFilter, String> {
        let date_range = DateRange {
            start: parse_bound(self.start.as_deref())?,
            end: parse_bound(self.end.as_deref())?,
        };
        let disposition = match self.disposition.as_deref().map(str::trim) {
            None | Some("") => DispositionFilter::All,
            Some(d) if d.eq_ignore_ascii_case("all") => DispositionFilter::All,
            Some(d) => DispositionFilter::Only(d.parse()?),
        };
        Ok(LeadFilter {
            date_range,
            site: SiteFilter::from_param(self.site.as_deref()),
            assigned_user: AssigneeFilter::from_param(self.assigned_user.as_deref()),
            disposition,
        })
    }
}

fn parse_bound(raw: Option<&str>) -> Result<Option<chrono::NaiveDate>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(day) => parse_day(day).map(Some),
    }
}

/// Editable lead columns, used both to create a lead and to patch one.
///
/// Absent fields are left untouched on update; unknown keys are written
/// through as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposition: Option<Disposition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_disposition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl LeadFields {
    /// Store field map holding only the fields that were provided.
    pub fn to_field_map(&self) -> FieldMap {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => FieldMap::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RemarkRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispositionRequest {
    pub disposition: Disposition,
    #[serde(default)]
    pub specific_disposition: Option<String>,
    /// Epoch milliseconds; required when `disposition` is `Reminder`.
    #[serde(default)]
    pub reminder_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub lead_ids: Vec<String>,
    /// `None` clears the assignment.
    #[serde(default)]
    pub assigned_to: Option<String>,
}
