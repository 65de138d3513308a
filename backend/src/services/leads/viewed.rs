use super::query::load_lead;
use crate::error::AppError;
use crate::services::auth::session::Session;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: Session,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let lead = load_lead(state.store.as_ref(), &id, &session)?;
    state.viewed.mark(&session.user.id, &lead.id)?;
    Ok(HttpResponse::NoContent().finish())
}
