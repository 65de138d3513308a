//! PDF rendering of the filtered lead list.
//!
//! Uses the LiberationSans family from `fonts_dir`; without it the export
//! fails with `500` and the CSV export remains available.

use super::export::attachment;
use super::query::dashboard_leads;
use crate::error::AppError;
use crate::services::auth::session::Session;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use chrono::Local;
use common::model::lead::Lead;
use common::pipeline::site::classify_site;
use common::requests::leads::ListLeadsQuery;
use genpdf::elements::{Break, Paragraph};
use genpdf::style::{Style, StyledString};
use genpdf::Document;
use std::path::Path;

const FONT_FAMILY: &str = "LiberationSans";
const FONT_SIZE_PT: u8 = 10;

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<ListLeadsQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = query.into_inner().into_filter().map_err(AppError::Validation)?;
    let leads = dashboard_leads(state.store.as_ref(), &filter, &session.viewer())?;
    let fonts_dir = state.config.fonts_dir.clone();

    let pdf = web::block(move || render_report(&fonts_dir, &leads))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(attachment("leads.pdf"))
        .body(pdf))
}

fn configure_document(fonts_dir: &Path) -> Result<Document, AppError> {
    let font_family = genpdf::fonts::from_files(fonts_dir, FONT_FAMILY, None).map_err(|e| {
        AppError::Internal(format!(
            "Cannot load {} fonts from {}: {}",
            FONT_FAMILY,
            fonts_dir.display(),
            e
        ))
    })?;
    let mut doc = Document::new(font_family);
    doc.set_title("Leads report");
    doc.set_font_size(FONT_SIZE_PT);
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);
    Ok(doc)
}

fn render_report(fonts_dir: &Path, leads: &[Lead]) -> Result<Vec<u8>, AppError> {
    let mut doc = configure_document(fonts_dir)?;
    doc.push(Paragraph::new(StyledString::new(
        format!("Leads report ({} leads)", leads.len()),
        Style::new().bold(),
    )));
    doc.push(Paragraph::new(format!(
        "Generated {}",
        Local::now().format("%Y-%m-%d %H:%M")
    )));
    doc.push(Break::new(1));

    for lead in leads {
        doc.push(Paragraph::new(StyledString::new(
            lead.name.clone().unwrap_or_else(|| "(no name)".to_string()),
            Style::new().bold(),
        )));
        doc.push(Paragraph::new(summary_line(lead)));
        if let Some(remark) = lead.remark.as_deref().filter(|r| !r.trim().is_empty()) {
            for line in remark.lines() {
                doc.push(Paragraph::new(StyledString::new(line.to_string(), Style::new().italic())));
            }
        }
        doc.push(Break::new(0.5));
    }

    let mut out = Vec::new();
    doc.render(&mut out)
        .map_err(|e| AppError::Internal(format!("PDF rendering failed: {}", e)))?;
    Ok(out)
}

fn summary_line(lead: &Lead) -> String {
    let parts = [
        lead.phone_number.clone(),
        lead.email.clone(),
        classify_site(lead),
        Some(format!("{} / {}", lead.disposition, lead.specific_disposition)),
        Some(
            lead.assigned_to
                .clone()
                .unwrap_or_else(|| "Unassigned".to_string()),
        ),
        lead.date.clone(),
    ];
    parts.into_iter().flatten().collect::<Vec<_>>().join(" | ")
}
