//! # Authentication Service Module
//!
//! Session-cookie authentication for the dashboard. A successful login sets
//! an HTTP-only cookie holding the user id and password version, signed with
//! the configured session secret. The `Session` extractor validates that
//! cookie on every protected route and compares the version against the
//! store, so changing a password logs out every other browser.
//!
//! ## Sub-modules:
//! - `accounts`: user records in the store (lookup, creation, admin seeding).
//! - `credentials`: password hashing and token signing.
//! - `session`: the `Session` extractor and cookie builders.
//! - `login`, `logout`, `me`, `password`: the route handlers.

pub mod accounts;
mod credentials;
mod login;
mod logout;
mod me;
mod password;
pub mod session;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/auth";

/// # Registered Routes:
///
/// *   **`POST /login`**: `{email, password}`; sets the session cookie and
///     returns the `User`. Wrong credentials yield `401`.
/// *   **`POST /logout`**: expires the session cookie.
/// *   **`GET /me`**: the user behind the current session.
/// *   **`POST /password`**: `{currentPassword, newPassword}`; bumps the
///     password version and reissues the cookie for the calling browser.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/login", post().to(login::process))
        .route("/logout", post().to(logout::process))
        .route("/me", get().to(me::process))
        .route("/password", post().to(password::process))
}
