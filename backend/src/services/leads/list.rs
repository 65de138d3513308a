use super::query::dashboard_leads;
use crate::error::AppError;
use crate::services::auth::session::Session;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::lead::LeadView;
use common::pipeline::site::classify_site;
use common::requests::leads::ListLeadsQuery;

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<ListLeadsQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = query.into_inner().into_filter().map_err(AppError::Validation)?;
    let leads = dashboard_leads(state.store.as_ref(), &filter, &session.viewer())?;
    let viewed = state.viewed.viewed_by(&session.user.id)?;

    let views: Vec<LeadView> = leads
        .into_iter()
        .map(|lead| LeadView {
            site: classify_site(&lead),
            viewed: viewed.contains(&lead.id),
            lead,
        })
        .collect();
    Ok(HttpResponse::Ok().json(views))
}
