use super::accounts::find_by_id;
use super::credentials::{issue_token, verify_token};
use crate::error::AppError;
use crate::state::AppState;
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use common::model::filter::Viewer;
use common::model::user::{Role, User};
use log::warn;
use std::future::{ready, Ready};

pub const SESSION_COOKIE: &str = "leadboard_session";

/// The authenticated caller.
///
/// Extracting a `Session` re-reads the user from the store on every request
/// and rejects the cookie when its password version is no longer current.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
}

impl Session {
    pub fn viewer(&self) -> Viewer {
        Viewer {
            email: self.user.email.clone(),
            role: self.user.role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Only admins can do this".into()))
        }
    }
}

impl FromRequest for Session {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<Session, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("Application state missing".into()))?;
    let cookie = req.cookie(SESSION_COOKIE).ok_or(AppError::Unauthorized)?;
    let (user_id, version) =
        verify_token(&state.config.session_secret, cookie.value()).ok_or(AppError::Unauthorized)?;

    let stored = find_by_id(state.store.as_ref(), &user_id)?.ok_or(AppError::Unauthorized)?;
    if stored.user.password_version != version {
        warn!("Rejected stale session for {}", stored.user.email);
        return Err(AppError::Unauthorized);
    }
    Ok(Session { user: stored.user })
}

pub fn session_cookie(state: &AppState, user: &User) -> Cookie<'static> {
    Cookie::build(
        SESSION_COOKIE,
        issue_token(&state.config.session_secret, &user.id, user.password_version),
    )
    .path("/")
    .http_only(true)
    .secure(state.config.secure_cookies)
    .same_site(SameSite::Lax)
    .finish()
}

pub fn expired_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::ZERO)
        .finish()
}
