use crate::model::lead::Lead;
use serde::{Deserialize, Serialize};

/// A follow-up scheduled for a lead.
///
/// Holds a snapshot of the lead so the notification can be shown even if the
/// lead changes afterwards. `reminder_time` is in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub lead_id: String,
    pub lead_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub specific_disposition: String,
    pub assigned_to: Option<String>,
    pub reminder_time: i64,
    pub created_by: String,
}

impl Reminder {
    pub fn for_lead(lead: &Lead, reminder_time: i64, created_by: &str) -> Self {
        Reminder {
            lead_id: lead.id.clone(),
            lead_name: lead.name.clone(),
            phone_number: lead.phone_number.clone(),
            email: lead.email.clone(),
            specific_disposition: lead.specific_disposition.clone(),
            assigned_to: lead.assigned_to.clone(),
            reminder_time,
            created_by: created_by.to_string(),
        }
    }

    /// Whether `email` owns or created this reminder.
    pub fn concerns(&self, email: &str) -> bool {
        self.created_by.eq_ignore_ascii_case(email)
            || self
                .assigned_to
                .as_deref()
                .is_some_and(|a| a.eq_ignore_ascii_case(email))
    }
}
