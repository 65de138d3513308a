use crate::pipeline::dates::parse_lead_date;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Default label for `specificDisposition` when a record carries none.
pub const DEFAULT_SPECIFIC_DISPOSITION: &str = "Undefined";

/// Status/outcome label of a lead.
///
/// The serialized form is the exact label the dashboard shows, e.g.
/// `"Registration Done"` or `"DNP"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Disposition {
    Hot,
    Cold,
    Warm,
    #[serde(rename = "DNP")]
    Dnp,
    #[serde(rename = "NTR")]
    Ntr,
    #[serde(rename = "CIR")]
    Cir,
    #[serde(rename = "Registration Done")]
    RegistrationDone,
    #[serde(rename = "Admission Fee Paid")]
    AdmissionFeePaid,
    #[serde(rename = "Admission Done")]
    AdmissionDone,
    #[serde(rename = "Asked to call back")]
    AskedToCallBack,
    #[serde(rename = "Post pone for Next year")]
    PostponeForNextYear,
    #[default]
    Undefined,
    Reminder,
}

impl Disposition {
    pub const ALL: [Disposition; 13] = [
        Disposition::Hot,
        Disposition::Cold,
        Disposition::Warm,
        Disposition::Dnp,
        Disposition::Ntr,
        Disposition::Cir,
        Disposition::RegistrationDone,
        Disposition::AdmissionFeePaid,
        Disposition::AdmissionDone,
        Disposition::AskedToCallBack,
        Disposition::PostponeForNextYear,
        Disposition::Undefined,
        Disposition::Reminder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Hot => "Hot",
            Disposition::Cold => "Cold",
            Disposition::Warm => "Warm",
            Disposition::Dnp => "DNP",
            Disposition::Ntr => "NTR",
            Disposition::Cir => "CIR",
            Disposition::RegistrationDone => "Registration Done",
            Disposition::AdmissionFeePaid => "Admission Fee Paid",
            Disposition::AdmissionDone => "Admission Done",
            Disposition::AskedToCallBack => "Asked to call back",
            Disposition::PostponeForNextYear => "Post pone for Next year",
            Disposition::Undefined => "Undefined",
            Disposition::Reminder => "Reminder",
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Disposition {
    type Err = String;

    /// Labels are matched case-insensitively after trimming.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Disposition::ALL
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown disposition '{}'", wanted))
    }
}

/// Key under which the deduplication engine groups leads.
///
/// Contact keys and record keys live in separate variants so a record id can
/// never collide with an `email-source` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Contact(String),
    Record(String),
}

/// A sales inquiry as seen by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
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
    #[serde(default)]
    pub disposition: Disposition,
    #[serde(default)]
    pub specific_disposition: String,
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
    /// Any other column of the record, passed through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Lead {
    pub fn identity_key(&self) -> IdentityKey {
        match (non_blank(&self.email), non_blank(&self.source)) {
            (Some(email), Some(source)) => IdentityKey::Contact(format!(
                "{}-{}",
                email.to_lowercase(),
                source.to_lowercase()
            )),
            _ => IdentityKey::Record(self.id.clone()),
        }
    }

    /// The lead date, or `None` when missing or unparsable.
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_lead_date)
    }

    pub fn is_assigned_to(&self, email: &str) -> bool {
        self.assigned_to
            .as_deref()
            .is_some_and(|assignee| assignee.trim().eq_ignore_ascii_case(email.trim()))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// A lead annotated for the dashboard listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadView {
    #[serde(flatten)]
    pub lead: Lead,
    pub site: Option<String>,
    pub viewed: bool,
}
