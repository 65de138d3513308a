use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label used for leads without a classifiable site.
pub const OTHERS_SITE: &str = "Others";
/// Label used for leads nobody owns.
pub const UNASSIGNED: &str = "Unassigned";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteBreakdown {
    pub site: String,
    pub total: usize,
    pub by_disposition: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total: usize,
    pub by_site: Vec<SiteBreakdown>,
    pub by_disposition: BTreeMap<String, usize>,
    pub by_assignee: BTreeMap<String, usize>,
}
