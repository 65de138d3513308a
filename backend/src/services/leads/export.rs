use super::columns::{export_headers, export_row};
use super::query::dashboard_leads;
use crate::error::AppError;
use crate::services::auth::session::Session;
use crate::state::AppState;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use common::model::lead::Lead;
use common::requests::leads::ListLeadsQuery;

/// `GET /api/leads/export.csv`: the filtered dashboard as a CSV attachment.
pub(crate) async fn process(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<ListLeadsQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = query.into_inner().into_filter().map_err(AppError::Validation)?;
    let leads = dashboard_leads(state.store.as_ref(), &filter, &session.viewer())?;
    let body = leads_to_csv(&leads)?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(attachment("leads.csv"))
        .body(body))
}

pub(crate) fn attachment(filename: &str) -> ContentDisposition {
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(filename.to_string())],
    }
}

fn leads_to_csv(leads: &[Lead]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let to_internal = |e: csv::Error| AppError::Internal(format!("CSV export failed: {}", e));

    writer.write_record(export_headers()).map_err(to_internal)?;
    for lead in leads {
        writer.write_record(export_row(lead)).map_err(to_internal)?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV export failed: {}", e)))
}
