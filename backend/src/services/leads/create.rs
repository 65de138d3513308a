use super::validation::check_new_lead;
use crate::error::AppError;
use crate::services::auth::session::Session;
use crate::state::AppState;
use crate::store::LEADS_TABLE;
use actix_web::{web, HttpResponse};
use chrono::Local;
use common::pipeline::normalize::normalize_record;
use common::requests::leads::LeadFields;
use log::info;

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: Session,
    payload: web::Json<LeadFields>,
) -> Result<HttpResponse, AppError> {
    let mut fields = payload.into_inner();
    check_new_lead(&mut fields)?;

    if fields.date.as_deref().is_none_or(|d| d.trim().is_empty()) {
        fields.date = Some(Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S").to_string());
    }
    if fields.assigned_to.is_none() && !session.is_admin() {
        fields.assigned_to = Some(session.user.email.clone());
    }

    let record = state.store.create(LEADS_TABLE, fields.to_field_map())?;
    info!("{} created lead {}", session.user.email, record.id);
    Ok(HttpResponse::Created().json(normalize_record(&record)))
}
