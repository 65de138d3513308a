//! School finder: the catalog and budget-based matching against it.
//!
//! The catalog lives in the `schools` table and is read fresh on every
//! request, retrying transient store failures as configured by
//! `catalog_retry_attempts` and `catalog_retry_delay_ms`.

mod catalog;
mod search;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/schools";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(catalog::process))
        // {budget, boards, classLevel} -> ranked matches
        .route("/match", post().to(search::process))
}
