use crate::error::AppError;
use crate::services::auth::accounts::list_users;
use crate::services::auth::session::Session;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::user::User;

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    session.require_admin()?;
    let users: Vec<User> = list_users(state.store.as_ref())?
        .into_iter()
        .map(|stored| stored.user)
        .collect();
    Ok(HttpResponse::Ok().json(users))
}
