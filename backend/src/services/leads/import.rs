//! Bulk lead import from an uploaded CSV file.
//!
//! The upload is read and hashed inside the request; parsing, validation and
//! store writes then run on the blocking pool and report progress through
//! the job controller. Rows failing validation are skipped and counted, a
//! store failure aborts the job.

use super::columns::field_for_header;
use super::validation::check_new_lead;
use crate::error::AppError;
use crate::job_controller::state::{JobUpdate, JobsState};
use crate::services::auth::session::Session;
use crate::state::AppState;
use crate::store::{RecordStore, LEADS_TABLE};
use actix_multipart::{Multipart, MultipartError};
use actix_web::{web, HttpResponse};
use common::jobs::JobStatus;
use common::model::lead::Disposition;
use common::model::record::FieldMap;
use common::requests::leads::LeadFields;
use futures_util::StreamExt;
use log::{debug, info, warn};
use md5::Context;
use rayon::prelude::*;
use serde_json::Value;
use std::fmt;
use std::time::Instant;
use tokio::sync::mpsc;

struct Upload {
    filename: String,
    bytes: Vec<u8>,
    md5: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ImportSummary {
    imported: usize,
    skipped: usize,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} imported, {} skipped", self.imported, self.skipped)
    }
}

pub(crate) async fn process(
    state: web::Data<AppState>,
    jobs: web::Data<JobsState>,
    session: Session,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;
    let upload = read_upload(payload).await?;
    let job_id = jobs.register().await;
    info!(
        "{} started import {} from {} ({} bytes, md5 {})",
        session.user.email,
        job_id,
        upload.filename,
        upload.bytes.len(),
        upload.md5
    );

    let store = state.store.clone();
    let tx = jobs.tx.clone();
    let job = job_id.clone();
    let bytes = upload.bytes;
    tokio::task::spawn_blocking(move || run_import(store.as_ref(), &tx, &job, &bytes));

    Ok(HttpResponse::Accepted().json(serde_json::json!({
        "jobId": job_id,
        "md5": upload.md5,
    })))
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::Validation(format!("Malformed upload: {}", e))
}

async fn read_upload(mut payload: Multipart) -> Result<Upload, AppError> {
    let mut upload = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(multipart_error)?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));
        if name.as_deref() != Some("file") {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();
        if !filename.to_ascii_lowercase().ends_with(".csv") {
            return Err(AppError::Validation("The file must end with .csv".into()));
        }

        let mut md5_hasher = Context::new();
        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(multipart_error)?;
            md5_hasher.consume(&chunk);
            bytes.extend_from_slice(&chunk);
        }
        upload = Some(Upload {
            filename,
            bytes,
            md5: format!("{:x}", md5_hasher.finalize()),
        });
    }

    upload.ok_or_else(|| AppError::Validation("Missing file".into()))
}

fn run_import(store: &dyn RecordStore, tx: &mpsc::Sender<JobUpdate>, job_id: &str, bytes: &[u8]) {
    let start = Instant::now();
    let status = match import_rows(store, bytes, |pct| {
        report(tx, job_id, JobStatus::InProgress(pct))
    }) {
        Ok(summary) => JobStatus::Completed(summary.to_string()),
        Err(reason) => JobStatus::Failed(reason),
    };
    info!("Import {} finished in {:.2?}: {:?}", job_id, start.elapsed(), status);
    report(tx, job_id, status);
}

fn report(tx: &mpsc::Sender<JobUpdate>, job_id: &str, status: JobStatus) {
    let update = JobUpdate {
        job_id: job_id.to_string(),
        status,
    };
    if tx.blocking_send(update).is_err() {
        warn!("Job updater stopped; dropping status of {}", job_id);
    }
}

/// Parses, validates and stores every row. `progress` receives percentages
/// in steps of at least ten.
fn import_rows<F>(store: &dyn RecordStore, bytes: &[u8], progress: F) -> Result<ImportSummary, String>
where
    F: Fn(u32),
{
    let rows = parse_rows(bytes)?;
    if rows.is_empty() {
        return Err("The file has no data rows".into());
    }

    let validated: Vec<Result<FieldMap, String>> = rows.into_par_iter().map(validate_row).collect();
    let total = validated.len();
    let mut summary = ImportSummary::default();
    let mut last_reported = 0;

    for (idx, row) in validated.into_iter().enumerate() {
        match row {
            Ok(fields) => {
                store.create(LEADS_TABLE, fields).map_err(|e| {
                    format!("Store failure after {} rows: {}", summary.imported, e)
                })?;
                summary.imported += 1;
            }
            Err(reason) => {
                // +2: header line and 1-based numbering
                debug!("Skipping row {}: {}", idx + 2, reason);
                summary.skipped += 1;
            }
        }
        let pct = ((idx + 1) * 100 / total) as u32;
        if pct >= last_reported + 10 {
            progress(pct);
            last_reported = pct;
        }
    }
    Ok(summary)
}

fn parse_rows(bytes: &[u8]) -> Result<Vec<FieldMap>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| format!("Unreadable header: {}", e))?
        .iter()
        .map(field_for_header)
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err("The file has no header row".into());
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| format!("Unreadable row {}: {}", idx + 2, e))?;
        let fields: FieldMap = headers
            .iter()
            .zip(record.iter())
            .filter(|(key, value)| !key.is_empty() && !value.is_empty())
            .map(|(key, value)| (key.clone(), Value::String(value.to_string())))
            .collect();
        if !fields.is_empty() {
            rows.push(fields);
        }
    }
    Ok(rows)
}

fn validate_row(mut fields: FieldMap) -> Result<FieldMap, String> {
    let disposition = match fields.get("disposition") {
        Some(Value::String(raw)) => Some(raw.parse::<Disposition>()),
        _ => None,
    };
    match disposition {
        // A reminder needs a time and a timer; imported rows get neither.
        Some(Ok(Disposition::Reminder)) => {
            debug!("Reminder disposition is not importable; importing as Undefined");
            fields.remove("disposition");
        }
        Some(Ok(d)) => {
            fields.insert("disposition".into(), Value::from(d.as_str()));
        }
        Some(Err(e)) => {
            debug!("{}; importing as Undefined", e);
            fields.remove("disposition");
        }
        None => {}
    }

    let mut lead: LeadFields =
        serde_json::from_value(Value::Object(fields)).map_err(|e| e.to_string())?;
    check_new_lead(&mut lead).map_err(|e| e.to_string())?;
    Ok(lead.to_field_map())
}
