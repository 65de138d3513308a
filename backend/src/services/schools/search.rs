use super::catalog::load_catalog;
use crate::error::AppError;
use crate::services::auth::session::Session;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::pipeline::matcher::match_schools;
use common::requests::schools::SchoolSearchRequest;
use log::debug;

pub(crate) async fn process(
    state: web::Data<AppState>,
    _session: Session,
    payload: web::Json<SchoolSearchRequest>,
) -> Result<HttpResponse, AppError> {
    let query = payload.into_inner().into_query().map_err(AppError::Validation)?;
    let catalog = load_catalog(
        state.store.as_ref(),
        state.config.catalog_retry_attempts,
        state.config.catalog_retry_delay(),
    )
    .await?;

    let matches = match_schools(&query, &catalog);
    debug!(
        "{} of {} schools match budget {} for {}",
        matches.len(),
        catalog.len(),
        query.budget,
        query.class_level
    );
    Ok(HttpResponse::Ok().json(matches))
}
