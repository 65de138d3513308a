use super::query::load_lead;
use crate::error::AppError;
use crate::services::auth::session::Session;
use crate::state::AppState;
use crate::store::LEADS_TABLE;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::lead::{Disposition, DEFAULT_SPECIFIC_DISPOSITION};
use common::model::record::FieldMap;
use common::model::reminder::Reminder;
use common::pipeline::normalize::normalize_record;
use common::requests::leads::DispositionRequest;
use serde_json::Value;

/// Sets the disposition of a lead.
///
/// `Reminder` needs a `reminderTime` in the future and (re)arms the lead's
/// timer; every other disposition resolves whatever reminder was pending.
pub(crate) async fn process(
    state: web::Data<AppState>,
    session: Session,
    id: web::Path<String>,
    payload: web::Json<DispositionRequest>,
) -> Result<HttpResponse, AppError> {
    let request = payload.into_inner();
    let lead = load_lead(state.store.as_ref(), &id, &session)?;

    let reminder_time = match (request.disposition, request.reminder_time) {
        (Disposition::Reminder, Some(at)) if at > Utc::now().timestamp_millis() => Some(at),
        (Disposition::Reminder, Some(_)) => {
            return Err(AppError::Validation("Reminder time must be in the future".into()))
        }
        (Disposition::Reminder, None) => {
            return Err(AppError::Validation("Reminder time is required".into()))
        }
        _ => None,
    };

    let specific = request
        .specific_disposition
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SPECIFIC_DISPOSITION.to_string());

    let mut changes = FieldMap::new();
    changes.insert("disposition".into(), Value::from(request.disposition.as_str()));
    changes.insert("specificDisposition".into(), Value::String(specific));
    let updated = normalize_record(&state.store.update(LEADS_TABLE, &lead.id, changes)?);

    match reminder_time {
        Some(at) => {
            state
                .reminders
                .schedule(Reminder::for_lead(&updated, at, &session.user.email))
                .await?
        }
        None => {
            state.reminders.cancel(&updated.id).await?;
        }
    }
    Ok(HttpResponse::Ok().json(updated))
}
