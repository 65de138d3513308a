//! The lead pipeline as served to the dashboard.
//!
//! Every read path (listing, exports, analytics) goes through
//! `dashboard_leads`: fetch all records, normalize, deduplicate, filter for
//! the caller, then sort newest first.

use crate::error::AppError;
use crate::services::auth::session::Session;
use crate::store::{RecordStore, LEADS_TABLE};
use common::model::filter::{LeadFilter, Viewer};
use common::model::lead::Lead;
use common::pipeline::dedup::dedup_leads;
use common::pipeline::filter::apply_filters;
use common::pipeline::normalize::{normalize_record, normalize_records};
use common::pipeline::order::sort_newest_first;

pub(crate) fn dashboard_leads(
    store: &dyn RecordStore,
    filter: &LeadFilter,
    viewer: &Viewer,
) -> Result<Vec<Lead>, AppError> {
    let records = store.list(LEADS_TABLE)?;
    let leads = dedup_leads(normalize_records(&records));
    let mut visible = apply_filters(leads, filter, viewer);
    sort_newest_first(&mut visible);
    Ok(visible)
}

/// Loads one lead, enforcing that non-admins only touch their own leads.
pub(crate) fn load_lead(store: &dyn RecordStore, id: &str, session: &Session) -> Result<Lead, AppError> {
    let lead = normalize_record(&store.get(LEADS_TABLE, id)?);
    if session.is_admin() || lead.is_assigned_to(&session.user.email) {
        Ok(lead)
    } else {
        Err(AppError::Forbidden("This lead is assigned to someone else".into()))
    }
}
