use crate::error::AppError;
use crate::job_controller::state::JobsState;
use crate::services::auth::session::Session;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(
    _session: Session,
    job_id: web::Path<String>,
    jobs: web::Data<JobsState>,
) -> Result<HttpResponse, AppError> {
    match jobs.status(&job_id).await {
        Some(status) => Ok(HttpResponse::Ok().json(status)),
        None => Err(AppError::NotFound(format!("Import job {}", job_id))),
    }
}
