use super::accounts::find_by_email;
use super::credentials::verify_password;
use super::session::session_cookie;
use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::auth::LoginRequest;
use log::{info, warn};

pub(crate) async fn process(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest { email, password } = payload.into_inner();
    let stored = find_by_email(state.store.as_ref(), &email)?
        .filter(|u| verify_password(&u.password_salt, &password, &u.password_hash));

    match stored {
        Some(stored) => {
            info!("{} logged in", stored.user.email);
            Ok(HttpResponse::Ok()
                .cookie(session_cookie(&state, &stored.user))
                .json(stored.user))
        }
        None => {
            warn!("Failed login for {}", email.trim());
            Err(AppError::Unauthorized)
        }
    }
}
