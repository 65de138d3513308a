//! Admin-only account management under `/api/users`.

mod create;
mod list;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/users";

/// *   **`GET /`**: every account (used to fill the assignee pickers).
/// *   **`POST /`**: creates an account from `{email, name, password, role}`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
}
