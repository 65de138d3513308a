use super::query::load_lead;
use super::validation::check_formats;
use crate::error::AppError;
use crate::services::auth::session::Session;
use crate::state::AppState;
use crate::store::LEADS_TABLE;
use actix_web::{web, HttpResponse};
use common::model::lead::Disposition;
use common::pipeline::normalize::normalize_record;
use common::requests::leads::LeadFields;

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: Session,
    id: web::Path<String>,
    payload: web::Json<LeadFields>,
) -> Result<HttpResponse, AppError> {
    let lead = load_lead(state.store.as_ref(), &id, &session)?;
    let mut fields = payload.into_inner();
    if fields.disposition == Some(Disposition::Reminder) {
        return Err(AppError::Validation(format!(
            "Set reminders through PUT /api/leads/{}/disposition with a reminderTime",
            lead.id
        )));
    }
    check_formats(&mut fields)?;

    if let Some(assignee) = fields.assigned_to.as_deref() {
        if !session.is_admin() && !assignee.trim().eq_ignore_ascii_case(&session.user.email) {
            return Err(AppError::Forbidden("Only admins can reassign leads".into()));
        }
    }

    let changes = fields.to_field_map();
    if changes.is_empty() {
        return Err(AppError::Validation("Nothing to update".into()));
    }

    let record = state.store.update(LEADS_TABLE, &lead.id, changes)?;
    if fields.disposition.is_some() {
        state.reminders.cancel(&lead.id).await?;
    }
    Ok(HttpResponse::Ok().json(normalize_record(&record)))
}
