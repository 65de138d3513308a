use super::query::load_lead;
use crate::error::AppError;
use crate::services::auth::session::Session;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::lead::LeadView;
use common::pipeline::site::classify_site;

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: Session,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let lead = load_lead(state.store.as_ref(), &id, &session)?;
    let viewed = state.viewed.viewed_by(&session.user.id)?.contains(&lead.id);
    Ok(HttpResponse::Ok().json(LeadView {
        site: classify_site(&lead),
        viewed,
        lead,
    }))
}
