//! `GET /api/analytics`: lead counts per site, disposition and assignee.
//!
//! Accepts the listing's query parameters; in practice the dashboard sends
//! a date range and optionally `assignedUser`.

use super::leads::query::dashboard_leads;
use crate::error::AppError;
use crate::services::auth::session::Session;
use crate::state::AppState;
use actix_web::web::{get, scope};
use actix_web::{web, HttpResponse, Scope};
use common::pipeline::analytics::summarize;
use common::requests::leads::ListLeadsQuery;

const API_PATH: &str = "/api/analytics";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(process))
}

async fn process(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<ListLeadsQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = query.into_inner().into_filter().map_err(AppError::Validation)?;
    let leads = dashboard_leads(state.store.as_ref(), &filter, &session.viewer())?;
    Ok(HttpResponse::Ok().json(summarize(&leads)))
}
