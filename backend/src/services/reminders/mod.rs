//! Reminder endpoints over the shared `ReminderRegistry`.
//!
//! Admins see every reminder; other users see the ones they created or that
//! belong to leads assigned to them.

use crate::error::AppError;
use crate::services::auth::session::Session;
use crate::state::AppState;
use actix_web::web::{delete, get, scope};
use actix_web::{web, HttpResponse, Scope};
use common::model::reminder::Reminder;
use log::info;

const API_PATH: &str = "/api/reminders";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(pending))
        .route("/due", get().to(due))
        .route("/{lead_id}", delete().to(resolve))
}

fn visible_to(session: &Session) -> impl Fn(&Reminder) -> bool + '_ {
    move |reminder: &Reminder| session.is_admin() || reminder.concerns(&session.user.email)
}

async fn pending(state: web::Data<AppState>, session: Session) -> Result<HttpResponse, AppError> {
    let visible = visible_to(&session);
    let reminders: Vec<Reminder> = state
        .reminders
        .pending()
        .await
        .into_iter()
        .filter(|r| visible(r))
        .collect();
    Ok(HttpResponse::Ok().json(reminders))
}

/// Drains fired reminders; each one is delivered once.
async fn due(state: web::Data<AppState>, session: Session) -> Result<HttpResponse, AppError> {
    let fired = state.reminders.take_due(visible_to(&session)).await;
    Ok(HttpResponse::Ok().json(fired))
}

async fn resolve(
    state: web::Data<AppState>,
    session: Session,
    lead_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let pending = state.reminders.pending().await;
    let reminder = pending
        .iter()
        .find(|r| r.lead_id == *lead_id)
        .ok_or_else(|| AppError::NotFound(format!("Reminder for lead {}", lead_id)))?;
    if !visible_to(&session)(reminder) {
        return Err(AppError::Forbidden("This reminder belongs to someone else".into()));
    }

    let cancelled = state.reminders.cancel(&lead_id).await?;
    info!("{} resolved the reminder for lead {}", session.user.email, lead_id);
    Ok(HttpResponse::Ok().json(cancelled))
}
