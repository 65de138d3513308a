//! HTTP surface of the dashboard backend.
//!
//! Each sub-module owns one `/api/...` scope and exposes
//! `configure_routes()`; `configure` mounts all of them.

pub mod analytics;
pub mod auth;
pub mod leads;
pub mod reminders;
pub mod schools;
pub mod users;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::configure_routes())
        .service(users::configure_routes())
        .service(leads::configure_routes())
        .service(analytics::configure_routes())
        .service(schools::configure_routes())
        .service(reminders::configure_routes());
}

/// JSON 404 for any path outside the registered scopes.
pub async fn not_found() -> actix_web::HttpResponse {
    actix_web::HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" }))
}
