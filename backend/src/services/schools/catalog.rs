use crate::error::AppError;
use crate::services::auth::session::Session;
use crate::state::AppState;
use crate::store::{RecordPages, RecordStore, StoreError, PAGE_SIZE, SCHOOLS_TABLE};
use actix_web::{web, HttpResponse};
use common::model::school::School;
use log::warn;
use std::time::Duration;

/// Reads the whole catalog, retrying failed reads up to `attempts` times in
/// total with `delay` between tries.
pub(crate) async fn load_catalog(
    store: &dyn RecordStore,
    attempts: u32,
    delay: Duration,
) -> Result<Vec<School>, StoreError> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match read_catalog(store) {
            Ok(catalog) => return Ok(catalog),
            Err(e) if attempt < attempts => {
                warn!(
                    "School catalog read failed (attempt {}/{}): {}",
                    attempt, attempts, e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

fn read_catalog(store: &dyn RecordStore) -> Result<Vec<School>, StoreError> {
    let mut catalog = Vec::new();
    for page in RecordPages::new(store, SCHOOLS_TABLE, PAGE_SIZE) {
        catalog.extend(
            page?
                .iter()
                .map(|record| School::from_fields(&record.fields))
                .filter(|school| !school.name.is_empty()),
        );
    }
    Ok(catalog)
}

pub(crate) async fn process(state: web::Data<AppState>, _session: Session) -> Result<HttpResponse, AppError> {
    let catalog = load_catalog(
        state.store.as_ref(),
        state.config.catalog_retry_attempts,
        state.config.catalog_retry_delay(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(catalog))
}
