use crate::error::AppError;
use crate::services::auth::session::Session;
use crate::state::AppState;
use crate::store::{StoreError, LEADS_TABLE};
use actix_web::{web, HttpResponse};
use common::model::record::FieldMap;
use common::requests::leads::AssignRequest;
use log::info;
use serde_json::Value;

/// Bulk (re)assignment. An absent or blank `assignedTo` unassigns.
///
/// Every id is checked first; one unknown id rejects the whole batch.
pub(crate) async fn process(
    state: web::Data<AppState>,
    session: Session,
    payload: web::Json<AssignRequest>,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;
    let AssignRequest { lead_ids, assigned_to } = payload.into_inner();
    if lead_ids.is_empty() {
        return Err(AppError::Validation("No leads selected".into()));
    }

    let assignee = assigned_to
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty());
    let value = assignee.clone().map(Value::String).unwrap_or(Value::Null);

    let mut missing = Vec::new();
    for id in &lead_ids {
        match state.store.get(LEADS_TABLE, id) {
            Ok(_) => {}
            Err(StoreError::NotFound { .. }) => missing.push(id.as_str()),
            Err(e) => return Err(e.into()),
        }
    }
    if !missing.is_empty() {
        return Err(AppError::NotFound(format!("Leads {}", missing.join(", "))));
    }

    for id in &lead_ids {
        let mut changes = FieldMap::new();
        changes.insert("assignedTo".into(), value.clone());
        state.store.update(LEADS_TABLE, id, changes)?;
    }

    info!(
        "{} assigned {} lead(s) to {}",
        session.user.email,
        lead_ids.len(),
        assignee.as_deref().unwrap_or("nobody")
    );
    Ok(HttpResponse::Ok().json(serde_json::json!({ "updated": lead_ids.len() })))
}
