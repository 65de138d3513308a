use crate::model::filter::{
    AssigneeFilter, DateRange, DispositionFilter, LeadFilter, SiteFilter, Viewer,
};
use crate::model::lead::Lead;
use crate::pipeline::site::classify_site;
use chrono::{Days, NaiveDateTime};

/// Applies the dashboard filters in their fixed order: date range, role
/// visibility, site, disposition. Input order is preserved.
///
/// An end bound before the start bound simply matches nothing.
pub fn apply_filters(leads: Vec<Lead>, filter: &LeadFilter, viewer: &Viewer) -> Vec<Lead> {
    let window = DayWindow::from(filter.date_range);

    leads
        .into_iter()
        .filter(|lead| window.admits(lead))
        .filter(|lead| is_visible(lead, &filter.assigned_user, viewer))
        .filter(|lead| matches_site(lead, &filter.site))
        .filter(|lead| matches_disposition(lead, filter.disposition))
        .collect()
}

/// Date range expanded to `[start 00:00, end + 1 day)`.
struct DayWindow {
    bounded: bool,
    from: Option<NaiveDateTime>,
    until: Option<NaiveDateTime>,
}

impl From<DateRange> for DayWindow {
    fn from(range: DateRange) -> Self {
        DayWindow {
            bounded: !range.is_unbounded(),
            from: range.start.and_then(|d| d.and_hms_opt(0, 0, 0)),
            until: range
                .end
                .and_then(|d| d.checked_add_days(Days::new(1)))
                .and_then(|d| d.and_hms_opt(0, 0, 0)),
        }
    }
}

impl DayWindow {
    fn admits(&self, lead: &Lead) -> bool {
        if !self.bounded {
            return true;
        }
        let Some(date) = lead.parsed_date() else {
            return false;
        };
        self.from.is_none_or(|from| date >= from) && self.until.is_none_or(|until| date < until)
    }
}

fn is_visible(lead: &Lead, assignee: &AssigneeFilter, viewer: &Viewer) -> bool {
    if !viewer.is_admin() {
        return lead.is_assigned_to(&viewer.email);
    }
    match assignee {
        AssigneeFilter::Anyone => true,
        AssigneeFilter::Unassigned => lead
            .assigned_to
            .as_deref()
            .is_none_or(|a| a.trim().is_empty()),
        AssigneeFilter::User(email) => lead.is_assigned_to(email),
    }
}

fn matches_site(lead: &Lead, site: &SiteFilter) -> bool {
    match site {
        SiteFilter::All => true,
        SiteFilter::Others => classify_site(lead).is_none(),
        SiteFilter::Site(wanted) => classify_site(lead).as_deref() == Some(wanted.as_str()),
    }
}

fn matches_disposition(lead: &Lead, disposition: DispositionFilter) -> bool {
    match disposition {
        DispositionFilter::All => true,
        DispositionFilter::Only(wanted) => lead.disposition == wanted,
    }
}
