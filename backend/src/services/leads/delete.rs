use super::query::load_lead;
use crate::error::AppError;
use crate::services::auth::session::Session;
use crate::state::AppState;
use crate::store::LEADS_TABLE;
use actix_web::{web, HttpResponse};
use log::info;

/// Deletes the lead and everything hanging off it: its pending reminder and
/// every user's viewed mark.
pub(crate) async fn process(
    state: web::Data<AppState>,
    session: Session,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let lead = load_lead(state.store.as_ref(), &id, &session)?;
    let deleted = state.store.delete(LEADS_TABLE, &lead.id)?;
    state.reminders.cancel(&deleted).await?;
    state.viewed.forget(&deleted)?;

    info!("{} deleted lead {}", session.user.email, deleted);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": deleted })))
}
