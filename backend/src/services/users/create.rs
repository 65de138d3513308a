use crate::error::AppError;
use crate::services::auth::accounts::create_user;
use crate::services::auth::session::Session;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::auth::CreateUserRequest;
use log::info;

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: Session,
    payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;
    let user = create_user(state.store.as_ref(), &payload)?;
    info!("{} created account {}", session.user.email, user.email);
    Ok(HttpResponse::Created().json(user))
}
