use super::accounts::{find_by_id, set_password};
use super::credentials::verify_password;
use super::session::{session_cookie, Session};
use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::auth::ChangePasswordRequest;
use log::info;

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: Session,
    payload: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let stored = find_by_id(state.store.as_ref(), &session.user.id)?.ok_or(AppError::Unauthorized)?;
    if !verify_password(&stored.password_salt, &payload.current_password, &stored.password_hash) {
        return Err(AppError::Validation("Current password is incorrect".into()));
    }

    let user = set_password(state.store.as_ref(), &stored, &payload.new_password)?;
    info!("{} changed password (version {})", user.email, user.password_version);
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&state, &user))
        .json(user))
}
