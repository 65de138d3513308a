use crate::model::analytics::{AnalyticsReport, SiteBreakdown, OTHERS_SITE, UNASSIGNED};
use crate::model::lead::Lead;
use crate::pipeline::site::classify_site;
use std::collections::BTreeMap;

/// Groups already-filtered leads by site, disposition and assignee.
pub fn summarize(leads: &[Lead]) -> AnalyticsReport {
    let mut sites: BTreeMap<String, SiteBreakdown> = BTreeMap::new();
    let mut by_disposition: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_assignee: BTreeMap<String, usize> = BTreeMap::new();

    for lead in leads {
        let site = classify_site(lead).unwrap_or_else(|| OTHERS_SITE.to_string());
        let disposition = lead.disposition.as_str().to_string();

        let entry = sites.entry(site.clone()).or_insert_with(|| SiteBreakdown {
            site,
            ..SiteBreakdown::default()
        });
        entry.total += 1;
        *entry.by_disposition.entry(disposition.clone()).or_default() += 1;

        *by_disposition.entry(disposition).or_default() += 1;

        let assignee = lead
            .assigned_to
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_lowercase)
            .unwrap_or_else(|| UNASSIGNED.to_string());
        *by_assignee.entry(assignee).or_default() += 1;
    }

    let mut by_site: Vec<SiteBreakdown> = sites.into_values().collect();
    by_site.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.site.cmp(&b.site)));

    AnalyticsReport {
        total: leads.len(),
        by_site,
        by_disposition,
        by_assignee,
    }
}
