use super::query::load_lead;
use crate::error::AppError;
use crate::services::auth::session::Session;
use crate::state::AppState;
use crate::store::LEADS_TABLE;
use actix_web::{web, HttpResponse};
use chrono::Local;
use common::model::record::FieldMap;
use common::pipeline::normalize::normalize_record;
use common::pipeline::remarks::append_remark;
use common::requests::leads::RemarkRequest;
use serde_json::Value;

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: Session,
    id: web::Path<String>,
    payload: web::Json<RemarkRequest>,
) -> Result<HttpResponse, AppError> {
    if payload.text.trim().is_empty() {
        return Err(AppError::Validation("Remark cannot be empty".into()));
    }
    let lead = load_lead(state.store.as_ref(), &id, &session)?;

    let author = if session.user.name.trim().is_empty() {
        &session.user.email
    } else {
        &session.user.name
    };
    let remark = append_remark(
        lead.remark.as_deref(),
        Local::now().naive_local(),
        author,
        &payload.text,
    );

    let mut changes = FieldMap::new();
    changes.insert("remark".into(), Value::String(remark));
    let record = state.store.update(LEADS_TABLE, &lead.id, changes)?;
    Ok(HttpResponse::Ok().json(normalize_record(&record)))
}
