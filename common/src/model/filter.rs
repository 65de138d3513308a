use crate::model::lead::Disposition;
use crate::model::user::Role;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive calendar-day range; a missing bound is open on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiteFilter {
    #[default]
    All,
    /// Leads whose site cannot be classified.
    Others,
    Site(String),
}

impl SiteFilter {
    /// Maps the dashboard's select value: `all`, `others`, or a site label.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => SiteFilter::All,
            Some(v) if v.eq_ignore_ascii_case("all") => SiteFilter::All,
            Some(v) if v.eq_ignore_ascii_case("others") => SiteFilter::Others,
            Some(v) => SiteFilter::Site(v.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssigneeFilter {
    #[default]
    Anyone,
    Unassigned,
    User(String),
}

impl AssigneeFilter {
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => AssigneeFilter::Anyone,
            Some(v) if v.eq_ignore_ascii_case("all") => AssigneeFilter::Anyone,
            Some(v) if v.eq_ignore_ascii_case("unassigned") => AssigneeFilter::Unassigned,
            Some(v) => AssigneeFilter::User(v.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispositionFilter {
    #[default]
    All,
    Only(Disposition),
}

/// Filter configuration applied by the lead pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadFilter {
    pub date_range: DateRange,
    pub site: SiteFilter,
    pub assigned_user: AssigneeFilter,
    pub disposition: DispositionFilter,
}

/// The caller on whose behalf leads are filtered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub email: String,
    pub role: Role,
}

impl Viewer {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
